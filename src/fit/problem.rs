//! What to fit: model combination, free parameters, start values and gases.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::concentration::ConcentrationModel;
use crate::data::Sample;
use crate::domain::{Data, GasType};
use crate::error::{NobleError, Result};

/// Levenberg–Marquardt controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitSettings {
    pub max_iterations: usize,
    /// Stop once an accepted step improves χ² by less than this fraction.
    pub tolerance: f64,
    pub initial_lambda: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            initial_lambda: 1e-3,
        }
    }
}

/// One measured gas of one sample, as seen by the fitter.
pub type Observation = (GasType, Data);

/// A configured fit shared (read-only) by every per-sample fit.
#[derive(Debug)]
pub struct FitProblem {
    model: ConcentrationModel,
    start: Vec<f64>,
    gases: Vec<GasType>,
    settings: FitSettings,
}

impl FitProblem {
    /// `start` holds a value for every registered parameter; the entries of
    /// `free` are varied, all others stay fixed.
    pub fn new(mut model: ConcentrationModel, free: &[usize], start: Vec<f64>, gases: Vec<GasType>) -> Result<Self> {
        let len = model.parameters().len();
        if start.len() != len {
            return Err(NobleError::InvalidArgument(format!(
                "start vector has {} values, parameter set has {len}",
                start.len()
            )));
        }
        if gases.is_empty() {
            return Err(NobleError::InvalidArgument("no gases selected".to_string()));
        }
        if let Some((k, &idx)) = free.iter().enumerate().find(|&(k, idx)| free[..k].contains(idx)) {
            return Err(NobleError::InvalidArgument(format!(
                "parameter {idx} is listed twice among the free parameters (position {k})"
            )));
        }
        model.configure(free)?;
        Ok(Self {
            model,
            start,
            gases,
            settings: FitSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: FitSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn model(&self) -> &ConcentrationModel {
        &self.model
    }

    pub fn free(&self) -> &[usize] {
        self.model.active()
    }

    pub fn start(&self) -> &[f64] {
        &self.start
    }

    pub fn gases(&self) -> &[GasType] {
        &self.gases
    }

    pub fn settings(&self) -> &FitSettings {
        &self.settings
    }

    /// Selected gases the sample actually measured. Unmeasured gases drop out.
    pub fn observations(&self, sample: &Sample) -> Vec<Observation> {
        self.gases
            .iter()
            .filter_map(|&gas| sample.measured(gas).map(|data| (gas, data)))
            .collect()
    }

    /// Clamp free parameters into their declared bounds.
    pub fn clamp(&self, values: &mut [f64]) {
        let descriptors = self.model.parameters().descriptors();
        for &idx in self.free() {
            values[idx] = descriptors[idx].clamp(values[idx]);
        }
    }

    pub fn chi2(&self, values: &[f64], observations: &[Observation]) -> f64 {
        observations
            .iter()
            .map(|&(gas, data)| {
                let r = (self.model.concentration(values, gas) - data.value) / data.error;
                r * r
            })
            .sum()
    }

    /// Weighted residuals and Jacobian at `values`. Returns χ².
    pub fn linearize(
        &self,
        values: &[f64],
        observations: &[Observation],
        jacobian: &mut DMatrix<f64>,
        residuals: &mut DVector<f64>,
    ) -> f64 {
        let mut row = vec![0.0; self.free().len()];
        for (i, &(gas, data)) in observations.iter().enumerate() {
            let c = self.model.jacobian_row(values, gas, &mut row);
            residuals[i] = (c - data.value) / data.error;
            for (k, d) in row.iter().enumerate() {
                jacobian[(i, k)] = d / data.error;
            }
        }
        residuals.norm_squared()
    }
}
