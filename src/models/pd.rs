//! Partial degassing: `C = (c_eq + A·z)·exp(−R·(D/D_Ne)^β)`.
//!
//! Same parameters as the PR model; the diffusive loss acts on the whole
//! dissolved amount instead of only the excess.

use super::model::{ExcessAirModel, Gradient};
use super::pr::{DiffusiveLoss, param, register_parameters};
use crate::domain::{GasType, dry_air_fraction};
use crate::params::{ParameterSet, ParameterValues};

pub const NAME: &str = "PD";

#[derive(Debug, Clone)]
pub struct PartialDegassing {
    indices: [usize; 4],
}

impl PartialDegassing {
    pub fn new(set: &mut ParameterSet) -> Self {
        Self {
            indices: register_parameters(set),
        }
    }
}

impl ExcessAirModel for PartialDegassing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        let loss = DiffusiveLoss::read(&self.indices, x, gas);
        (c_eq + loss.a * dry_air_fraction(gas)) * loss.factor
    }

    fn gradient(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let loss = DiffusiveLoss::read(&self.indices, x, gas);
        let z = dry_air_fraction(gas);

        let mut g = Gradient {
            by_ceq: loss.factor,
            ..Gradient::default()
        };
        g.by_param[param::A] = z * loss.factor;
        loss.fill(c_eq + loss.a * z, &mut g);
        g
    }
}
