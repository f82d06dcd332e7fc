//! Unfractionated excess air with oxygen depletion: `C = P_OD·c_eq + A·z`.
//!
//! `P_OD` scales the equilibrium component to account for the pressure
//! increase in soil air after O₂ consumption.

use super::model::{ExcessAirModel, Gradient};
use crate::domain::{GasType, dry_air_fraction};
use crate::params::{ParameterSet, ParameterValues, standard};

pub const NAME: &str = "OD";

pub mod param {
    pub const A: usize = 0;
    pub const P_OD: usize = 1;
}

#[derive(Debug, Clone)]
pub struct OxygenDepletion {
    indices: [usize; 2],
}

impl OxygenDepletion {
    pub fn new(set: &mut ParameterSet) -> Self {
        let a = set.register(standard::excess_air());
        let p_od = set.register(standard::oxygen_depletion());
        Self { indices: [a, p_od] }
    }
}

impl ExcessAirModel for OxygenDepletion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        let a = x.value(self.indices[param::A]);
        let p_od = x.value(self.indices[param::P_OD]);
        p_od * c_eq + a * dry_air_fraction(gas)
    }

    fn gradient(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let mut g = Gradient {
            by_ceq: x.value(self.indices[param::P_OD]),
            ..Gradient::default()
        };
        g.by_param[param::A] = dry_air_fraction(gas);
        g.by_param[param::P_OD] = c_eq;
        g
    }
}
