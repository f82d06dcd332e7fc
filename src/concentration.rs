//! Equilibrium method + excess-air model evaluated together.
//!
//! The combined Jacobian row of one sample/gas is built by two collectors that
//! point at the same row window: the equilibrium method writes `∂c_eq/∂θ`, then
//! the excess-air model folds those into `dC/dθ`. [`ConcentrationModel`] owns
//! that ordering.

use crate::ceq::CEqMethod;
use crate::derivative::{DerivativeCollector, SlotRange};
use crate::domain::GasType;
use crate::error::{NobleError, Result};
use crate::models::ExcessAirModel;
use crate::params::{ParameterSet, ParameterValues};
use crate::registry::{MethodRegistry, ModelRegistry};

#[derive(Debug)]
pub struct ConcentrationModel {
    parameters: ParameterSet,
    method: Box<dyn CEqMethod>,
    model: Box<dyn ExcessAirModel>,
    method_collector: DerivativeCollector,
    model_collector: DerivativeCollector,
    active: Vec<usize>,
}

impl ConcentrationModel {
    /// Create the method first, then the model, against one fresh parameter set.
    pub fn from_registries(
        methods: &MethodRegistry,
        method_name: &str,
        models: &ModelRegistry,
        model_name: &str,
    ) -> Result<Self> {
        let mut parameters = ParameterSet::new();
        let method = methods.create(method_name, &mut parameters)?;
        let model = models.create(model_name, &mut parameters)?;
        Ok(Self::new(parameters, method, model))
    }

    pub fn new(parameters: ParameterSet, method: Box<dyn CEqMethod>, model: Box<dyn ExcessAirModel>) -> Self {
        let method_collector = method.derivative_collector();
        let model_collector = model.derivative_collector();
        Self {
            parameters,
            method,
            model,
            method_collector,
            model_collector,
            active: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn method(&self) -> &dyn CEqMethod {
        self.method.as_ref()
    }

    pub fn model(&self) -> &dyn ExcessAirModel {
        self.model.as_ref()
    }

    /// Active (free) parameter indices, in Jacobian column order.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Select the free parameters. Both collectors map into one row of
    /// `active_indices.len()` slots.
    pub fn configure(&mut self, active_indices: &[usize]) -> Result<()> {
        if let Some(&bad) = active_indices.iter().find(|&&idx| idx >= self.parameters.len()) {
            return Err(NobleError::OutOfRange {
                what: "parameters",
                index: bad,
                len: self.parameters.len(),
            });
        }
        let window = SlotRange::whole(active_indices.len());
        self.method_collector
            .set_derivatives_and_results_vector(window, active_indices)?;
        self.model_collector
            .set_derivatives_and_results_vector(window, active_indices)?;
        self.active = active_indices.to_vec();
        Ok(())
    }

    /// Select the free parameters by name.
    pub fn configure_by_name<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let indices = self.parameters.indices_of(names)?;
        self.configure(&indices)
    }

    pub fn equilibrium(&self, values: &[f64], gas: GasType) -> f64 {
        self.method.equilibrium(&ParameterValues::new(values), gas)
    }

    /// Predicted concentration in cm³STP/g.
    pub fn concentration(&self, values: &[f64], gas: GasType) -> f64 {
        let x = ParameterValues::new(values);
        let c_eq = self.method.equilibrium(&x, gas);
        self.model.concentration(c_eq, &x, gas)
    }

    /// Fill `row` with `dC/dθ` for every active parameter and return `C`.
    ///
    /// # Panics
    /// Panics if `row.len()` differs from the number of active parameters.
    pub fn jacobian_row(&self, values: &[f64], gas: GasType, row: &mut [f64]) -> f64 {
        assert_eq!(row.len(), self.active.len(), "Jacobian row length must match active parameters");
        let x = ParameterValues::new(values);
        let c_eq = self.method.equilibrium(&x, gas);

        row.fill(0.0);
        self.method.derivatives(&x, &self.method_collector, row, gas);
        self.model.derivatives(c_eq, &x, &self.model_collector, row, gas);

        self.model.concentration(c_eq, &x, gas)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn build(method: &str, model: &str) -> ConcentrationModel {
        ConcentrationModel::from_registries(
            &MethodRegistry::with_builtin(),
            method,
            &ModelRegistry::with_builtin(),
            model,
        )
        .unwrap()
    }

    #[test]
    fn combined_row_matches_finite_differences() {
        for model_name in ModelRegistry::with_builtin().names() {
            for method_name in ["Weiss", "Jenkins"] {
                let mut combined = build(method_name, model_name);
                let all: Vec<usize> = (0..combined.parameters().len()).collect();
                combined.configure(&all).unwrap();

                let mut values = combined.parameters().defaults();
                values[combined.parameters().index_of("A").unwrap()] = 0.01;
                values[combined.parameters().index_of("S").unwrap()] = 2.0;
                values[combined.parameters().index_of("p").unwrap()] = 0.9;

                for gas in GasType::ALL {
                    let mut row = vec![0.0; all.len()];
                    let c = combined.jacobian_row(&values, gas, &mut row);
                    assert_eq!(c, combined.concentration(&values, gas));

                    for (slot, &global) in all.iter().enumerate() {
                        let h = 1e-6 * values[global].abs().max(1e-2);
                        let mut up = values.clone();
                        let mut down = values.clone();
                        up[global] += h;
                        down[global] -= h;
                        let numeric = (combined.concentration(&up, gas) - combined.concentration(&down, gas)) / (2.0 * h);
                        assert_relative_eq!(row[slot], numeric, max_relative = 1e-4, epsilon = 1e-30);
                    }
                }
            }
        }
    }

    #[test]
    fn subset_of_active_parameters_fills_only_its_columns() {
        let mut combined = build("Weiss", "GR");
        combined.configure_by_name(["T", "A"]).unwrap();
        let values = combined.parameters().defaults();

        let mut full = build("Weiss", "GR");
        let all: Vec<usize> = (0..full.parameters().len()).collect();
        full.configure(&all).unwrap();

        let mut row = vec![0.0; 2];
        let mut full_row = vec![0.0; all.len()];
        combined.jacobian_row(&values, GasType::Kr, &mut row);
        full.jacobian_row(&values, GasType::Kr, &mut full_row);

        let t = combined.parameters().index_of("T").unwrap();
        let a = combined.parameters().index_of("A").unwrap();
        assert_eq!(row[0], full_row[t]);
        assert_eq!(row[1], full_row[a]);
    }

    #[test]
    fn configure_rejects_unknown_indices_and_names() {
        let mut combined = build("Weiss", "UA");
        assert!(matches!(combined.configure(&[0, 99]), Err(NobleError::OutOfRange { index: 99, .. })));
        assert!(matches!(
            combined.configure_by_name(["T", "F_GR"]),
            Err(NobleError::UnknownParameter(_))
        ));
    }
}
