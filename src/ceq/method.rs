//! The equilibrium-concentration method interface.

use std::fmt::Debug;

use super::solubility::{Equilibrium, SolubilityFit};
use crate::derivative::{DerivativeCollector, DerivativeTarget, OtherParameters};
use crate::domain::{ATMOSPHERIC_HE3_RATIO, GasType, HE3_SOLUBILITY_FRACTIONATION};
use crate::params::{ParameterSet, ParameterValues, standard};

/// Local parameter indices shared by every equilibrium method.
pub mod param {
    pub const T: usize = 0;
    pub const S: usize = 1;
    pub const P: usize = 2;
}

/// Computes the solubility-equilibrium concentration `c_eq(T, S, p)` of a gas.
pub trait CEqMethod: Debug + Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Global indices of `T`, `S` and `p`, in that order.
    fn parameter_indices(&self) -> &[usize];

    /// `c_eq` in cm³STP/g with its partial derivatives.
    fn evaluate(&self, x: &ParameterValues<'_>, gas: GasType) -> Equilibrium;

    fn equilibrium(&self, x: &ParameterValues<'_>, gas: GasType) -> f64 {
        self.evaluate(x, gas).value
    }

    /// Write `∂c_eq/∂T`, `∂c_eq/∂S` and `∂c_eq/∂p` into the tracked slots.
    ///
    /// Slots of other parameters are left untouched.
    fn derivatives(&self, x: &ParameterValues<'_>, collector: &DerivativeCollector, row: &mut [f64], gas: GasType) {
        let eq = self.evaluate(x, gas);
        collector.for_each_slot(row, |target, slot| match target {
            DerivativeTarget::Parameter(param::T) => *slot = eq.d_t,
            DerivativeTarget::Parameter(param::S) => *slot = eq.d_s,
            DerivativeTarget::Parameter(param::P) => *slot = eq.d_p,
            DerivativeTarget::Parameter(_) | DerivativeTarget::Other => {}
        });
    }

    /// An unconfigured collector for this method's parameters.
    fn derivative_collector(&self) -> DerivativeCollector {
        DerivativeCollector::new(self.parameter_indices().to_vec(), OtherParameters::Ignore)
    }
}

/// Global indices of the (T, S, p) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodParameters {
    indices: [usize; 3],
}

impl MethodParameters {
    pub fn register(set: &mut ParameterSet) -> Self {
        let t = set.register(standard::temperature());
        let s = set.register(standard::salinity());
        let p = set.register(standard::pressure());
        Self { indices: [t, s, p] }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// `(T, S, p)` values.
    pub fn read(&self, x: &ParameterValues<'_>) -> (f64, f64, f64) {
        let [t, s, p] = self.indices;
        (x.value(t), x.value(s), x.value(p))
    }
}

/// Evaluate a per-gas fit table, deriving ³He from ⁴He.
pub(crate) fn evaluate_table(
    table: impl Fn(GasType) -> SolubilityFit,
    params: &MethodParameters,
    x: &ParameterValues<'_>,
    gas: GasType,
) -> Equilibrium {
    let (t, s, p) = params.read(x);
    match gas {
        GasType::He3 => table(GasType::He)
            .evaluate(t, s, p)
            .scaled(ATMOSPHERIC_HE3_RATIO * HE3_SOLUBILITY_FRACTIONATION),
        _ => table(gas).evaluate(t, s, p),
    }
}
