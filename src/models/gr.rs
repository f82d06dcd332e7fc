//! Gas diffusion relaxation.
//!
//! ```text
//! C = c_eq·P_OD + A·z·exp(−F·D^β)
//! ```
//!
//! `D` is the diffusion coefficient of the gas in air at the model's own `T`
//! and `p` (see [`GasDiffusionModel`]), so the excess component is
//! fractionated by gas-phase diffusion in the unsaturated zone.

use super::model::{ExcessAirModel, Gradient};
use crate::domain::{GasType, dry_air_fraction};
use crate::math::GasDiffusionModel;
use crate::params::{ParameterDescriptor, ParameterSet, ParameterValues, standard};

pub const NAME: &str = "GR";

pub mod param {
    pub const A: usize = 0;
    pub const F: usize = 1;
    pub const BETA: usize = 2;
    pub const P_OD: usize = 3;
    pub const T: usize = 4;
    pub const P: usize = 5;
}

#[derive(Debug, Clone, Copy)]
struct GrValues {
    a: f64,
    f: f64,
    beta: f64,
    p_od: f64,
    t: f64,
    p: f64,
}

#[derive(Debug, Clone)]
pub struct GasDiffusionRelaxation {
    indices: [usize; 6],
}

impl GasDiffusionRelaxation {
    pub fn new(set: &mut ParameterSet) -> Self {
        let a = set.register(standard::excess_air());
        let f = set.register(ParameterDescriptor::new("F_GR", "", 1.0, 0.0, f64::INFINITY, 0.01));
        let beta = set.register(ParameterDescriptor::new("beta_GR", "", 0.667, 0.0, 5.0, 0.01));
        let p_od = set.register(standard::oxygen_depletion());
        let t = set.register(standard::temperature());
        let p = set.register(standard::pressure());
        Self {
            indices: [a, f, beta, p_od, t, p],
        }
    }

    fn read(&self, x: &ParameterValues<'_>) -> GrValues {
        let v = |k: usize| x.value(self.indices[k]);
        GrValues {
            a: v(param::A),
            f: v(param::F),
            beta: v(param::BETA),
            p_od: v(param::P_OD),
            t: v(param::T),
            p: v(param::P),
        }
    }
}

impl ExcessAirModel for GasDiffusionRelaxation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        &self.indices
    }

    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        let v = self.read(x);
        let d = GasDiffusionModel::new(v.t, v.p, gas).evaluate();
        c_eq * v.p_od + v.a * dry_air_fraction(gas) * (-v.f * d.powf(v.beta)).exp()
    }

    fn gradient(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient {
        let v = self.read(x);
        let z = dry_air_fraction(gas);
        let diffusion = GasDiffusionModel::new(v.t, v.p, gas);
        let d = diffusion.evaluate();
        let d_pow = d.powf(v.beta);
        let excess = v.a * z * (-v.f * d_pow).exp();
        // ∂C/∂D, shared by the T and p derivatives.
        let by_d = -excess * v.f * v.beta * d.powf(v.beta - 1.0);

        let mut g = Gradient {
            by_ceq: v.p_od,
            ..Gradient::default()
        };
        g.by_param[param::A] = z * (-v.f * d_pow).exp();
        g.by_param[param::F] = -excess * d_pow;
        g.by_param[param::BETA] = -excess * v.f * d_pow * d.ln();
        g.by_param[param::P_OD] = c_eq;
        g.by_param[param::T] = by_d * diffusion.derive_by_t();
        g.by_param[param::P] = by_d * diffusion.derive_by_p_atm();
        g
    }
}
