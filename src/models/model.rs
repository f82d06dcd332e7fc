//! The excess-air model interface.
//!
//! Every model predicts a dissolved gas concentration `C` from the
//! equilibrium concentration `c_eq` and its own parameters. The fitter relies
//! on two primitive operations:
//!
//! - `concentration`: predict `C` (for residuals)
//! - `gradient`: `∂C/∂c_eq` and `∂C/∂θ` for each own parameter θ (for the Jacobian)
//!
//! `derivatives` combines the gradient with whatever the equilibrium pass
//! already wrote into the row (chain rule through `c_eq`).

use std::fmt::Debug;

use crate::derivative::{DerivativeCollector, DerivativeTarget, OtherParameters};
use crate::domain::GasType;
use crate::params::ParameterValues;

/// Largest number of own parameters of any model.
pub const MAX_PARAMETERS: usize = 6;

/// Partial derivatives of a predicted concentration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gradient {
    /// `∂C/∂c_eq`.
    pub by_ceq: f64,
    /// `∂C/∂θ_k` for local parameter `k`, with `c_eq` held fixed.
    pub by_param: [f64; MAX_PARAMETERS],
}

pub trait ExcessAirModel: Debug + Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Global indices of the model's own parameters in local order.
    fn parameter_indices(&self) -> &[usize];

    /// Predicted concentration in cm³STP/g.
    fn concentration(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64;

    fn gradient(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> Gradient;

    /// `∂C/∂c_eq`.
    fn concentration_derivative_by_ceq(&self, c_eq: f64, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        self.gradient(c_eq, x, gas).by_ceq
    }

    /// Update the tracked slots of `row` to hold `dC/dθ`.
    ///
    /// Precondition: every tracked slot already holds `∂c_eq/∂θ` (zero for
    /// parameters the equilibrium method does not own). Own parameters become
    /// `slot · ∂C/∂c_eq + ∂C/∂θ`; foreign parameters become `slot · ∂C/∂c_eq`.
    fn derivatives(
        &self,
        c_eq: f64,
        x: &ParameterValues<'_>,
        collector: &DerivativeCollector,
        row: &mut [f64],
        gas: GasType,
    ) {
        let g = self.gradient(c_eq, x, gas);
        collector.for_each_slot(row, |target, slot| match target {
            DerivativeTarget::Parameter(k) => *slot = *slot * g.by_ceq + g.by_param[k],
            DerivativeTarget::Other => *slot *= g.by_ceq,
        });
    }

    /// An unconfigured collector for this model, tracking foreign parameters.
    fn derivative_collector(&self) -> DerivativeCollector {
        DerivativeCollector::new(self.parameter_indices().to_vec(), OtherParameters::Track)
    }
}
