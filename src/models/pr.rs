//! Partial re-equilibration (Stute et al., 1995).
//!
//! ```text
//! C = c_eq + A·z·exp(−R·(D/D_Ne)^β)
//! ```
//!
//! `D/D_Ne` is the ratio of molecular diffusivities in water, which depends on
//! the recharge temperature `T`.

use super::model::{ExcessAirModel, Gradient};
use crate::domain::{GasType, dry_air_fraction};
use crate::math::ratio_to_neon;
use crate::params::{ParameterDescriptor, ParameterSet, ParameterValues, standard};

pub const NAME: &str = "PR";

pub mod param {
    pub const A: usize = 0;
    pub const R: usize = 1;
    pub const BETA: usize = 2;
    pub const T: usize = 3;
}

/// Global indices of `(A, R, beta, T)`, shared by the PR and PD models.
pub(super) fn register_parameters(set: &mut ParameterSet) -> [usize; 4] {
    let a = set.register(standard::excess_air());
    let r = set.register(ParameterDescriptor::new("R", "", 1.0, 0.0, 100.0, 0.01));
    let beta = set.register(ParameterDescriptor::new("beta", "", 1.0, 0.0, 2.0, 0.01));
    let t = set.register(standard::temperature());
    [a, r, beta, t]
}

/// The loss factor `exp(−R·r^β)` and the pieces of its derivatives.
#[derive(Debug, Clone, Copy)]
pub(super) struct DiffusiveLoss {
    pub a: f64,
    pub r: f64,
    pub beta: f64,
    /// `r^β` with `r = D/D_Ne`.
    pub ratio_pow: f64,
    pub ln_ratio: f64,
    /// `d(r^β)/dT`.
    pub d_ratio_pow_t: f64,
    pub factor: f64,
}

impl DiffusiveLoss {
    pub fn read(indices: &[usize; 4], x: &ParameterValues<'_>, gas: GasType) -> Self {
        let a = x.value(indices[param::A]);
        let r = x.value(indices[param::R]);
        let beta = x.value(indices[param::BETA]);
        let t = x.value(indices[param::T]);

        let (ratio, d_ratio_t) = ratio_to_neon(t, gas);
        let ratio_pow = ratio.powf(beta);
        Self {
            a,
            r,
            beta,
            ratio_pow,
            ln_ratio: ratio.ln(),
            d_ratio_pow_t: beta * ratio.powf(beta - 1.0) * d_ratio_t,
            factor: (-r * ratio_pow).exp(),
        }
    }

    /// Fill `∂/∂R`, `∂/∂β`, `∂/∂T` of `amount · factor`.
    pub fn fill(&self, amount: f64, g: &mut Gradient) {
        let scaled = amount * self.factor;
        g.by_param[param::R] = -scaled * self.ratio_pow;
        g.by_param[param::BETA] = -scaled * self.r * self.ratio_pow * self.ln_ratio;
        g.by_param[param::T] = -scaled * self.r * self.d_ratio_pow_t;
    }
}

#[derive(Debug, Clone)]
pub struct PartialReequilibration {
    indices: [usize; 4],
}

impl PartialReequilibration {
    pub fn new(set: &mut ParameterSet) -> Self {
        Self {
            indices: register_parameters(set),
        }
    }
}

impl ExcessAirModel for PartialReequilibration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        let loss = DiffusiveLoss::read(&self.indices, x, gas);
        c_eq + loss.a * dry_air_fraction(gas) * loss.factor
    }

    fn gradient(&self, _c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let loss = DiffusiveLoss::read(&self.indices, x, gas);
        let z = dry_air_fraction(gas);

        let mut g = Gradient {
            by_ceq: 1.0,
            ..Gradient::default()
        };
        g.by_param[param::A] = z * loss.factor;
        loss.fill(loss.a * z, &mut g);
        g
    }
}
