//! Closed-system equilibration (Aeschbach-Hertig et al., 2000).
//!
//! ```text
//! C = c_eq + (1 − F)·A·z / (1 + F·A·z / c_eq)
//! ```
//!
//! `A` is the initial amount of entrapped air and `F` the ratio of the final to
//! the initial gas volume (fractionation).

use super::model::{ExcessAirModel, Gradient};
use crate::domain::{GasType, dry_air_fraction};
use crate::params::{ParameterDescriptor, ParameterSet, ParameterValues, standard};

pub const NAME: &str = "CE";

pub mod param {
    pub const A: usize = 0;
    pub const F: usize = 1;
}

#[derive(Debug, Clone)]
pub struct ClosedEquilibration {
    indices: [usize; 2],
}

impl ClosedEquilibration {
    pub fn new(set: &mut ParameterSet) -> Self {
        let a = set.register(standard::excess_air());
        let f = set.register(ParameterDescriptor::new("F", "", 0.5, 0.0, 1.0, 0.01));
        Self { indices: [a, f] }
    }

    fn read(&self, x: &ParameterValues<'_>) -> (f64, f64) {
        (x.value(self.indices[param::A]), x.value(self.indices[param::F]))
    }
}

impl ExcessAirModel for ClosedEquilibration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        let (a, f) = self.read(x);
        let u = a * dry_air_fraction(gas);
        c_eq + (1.0 - f) * u / (1.0 + f * u / c_eq)
    }

    fn gradient(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let (a, f) = self.read(x);
        let z = dry_air_fraction(gas);
        let u = a * z;
        let denom = 1.0 + f * u / c_eq;
        let denom_sq = denom * denom;

        let mut g = Gradient {
            by_ceq: 1.0 + (1.0 - f) * f * u * u / (c_eq * c_eq * denom_sq),
            ..Gradient::default()
        };
        g.by_param[param::A] = (1.0 - f) * z / denom_sq;
        g.by_param[param::F] = -u * (1.0 + u / c_eq) / denom_sq;
        g
    }
}
