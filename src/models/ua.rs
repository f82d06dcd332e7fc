//! Unfractionated excess air: `C = c_eq + A·z`.

use super::model::{ExcessAirModel, Gradient};
use crate::domain::{GasType, dry_air_fraction};
use crate::params::{ParameterSet, ParameterValues, standard};

pub const NAME: &str = "UA";

pub mod param {
    pub const A: usize = 0;
}

#[derive(Debug, Clone)]
pub struct UnfractionatedAir {
    indices: [usize; 1],
}

impl UnfractionatedAir {
    pub fn new(set: &mut ParameterSet) -> Self {
        Self {
            indices: [set.register(standard::excess_air())],
        }
    }
}

impl ExcessAirModel for UnfractionatedAir {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        c_eq + x.value(self.indices[param::A]) * dry_air_fraction(gas)
    }

    fn gradient(&self, _c_eq: f64, _x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let mut g = Gradient {
            by_ceq: 1.0,
            ..Gradient::default()
        };
        g.by_param[param::A] = dry_air_fraction(gas);
        g
    }
}
