//! Levenberg–Marquardt fit of one sample, and of a whole run in parallel.
//!
//! For a sample with measured gases `i` we minimize
//!
//! ```text
//! χ² = Σ ((C_i(θ) − C_meas,i) / σ_i)²
//! ```
//!
//! over the free parameters θ. Each iteration solves the damped linear
//! problem from [`crate::math::damped_step`] using the analytic Jacobian of
//! [`ConcentrationModel::jacobian_row`](crate::concentration::ConcentrationModel::jacobian_row),
//! clamps the trial point into the declared bounds and accepts it only if χ²
//! does not grow.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, info, warn};

use super::problem::{FitProblem, Observation};
use crate::data::{RunData, Sample};
use crate::domain::GasType;
use crate::error::{NobleError, Result};
use crate::math::{covariance, damped_step};

const MIN_LAMBDA: f64 = 1e-12;
const MAX_LAMBDA: f64 = 1e12;

/// Fitted value of one free parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterEstimate {
    pub name: String,
    pub unit: String,
    pub value: f64,
    /// 1σ from the covariance matrix; `None` when the data do not determine it.
    pub error: Option<f64>,
}

/// Measured vs. modelled concentration of one gas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasResidual {
    pub gas: GasType,
    pub measured: f64,
    pub error: f64,
    pub modelled: f64,
    /// `(modelled − measured) / error`.
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFit {
    pub sample: String,
    /// Full parameter vector at the optimum (free and fixed).
    pub values: Vec<f64>,
    pub estimates: Vec<ParameterEstimate>,
    pub residuals: Vec<GasResidual>,
    pub chi2: f64,
    pub dof: usize,
    /// P(χ² ≥ observed); `None` without degrees of freedom.
    pub probability: Option<f64>,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFailure {
    pub sample: String,
    pub message: String,
}

/// Results of fitting every enabled sample, in sample order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunFit {
    pub fits: Vec<SampleFit>,
    pub failures: Vec<SampleFailure>,
}

/// Fit one sample.
pub fn fit_sample(problem: &FitProblem, sample: &Sample) -> Result<SampleFit> {
    let observations = problem.observations(sample);
    if observations.is_empty() {
        return Err(NobleError::Fit(format!(
            "sample `{}` has none of the selected gases measured",
            sample.name
        )));
    }

    let free = problem.free();
    let settings = problem.settings();
    let n = observations.len();
    let p = free.len();

    let mut x = problem.start().to_vec();
    problem.clamp(&mut x);

    let mut jacobian = DMatrix::<f64>::zeros(n, p);
    let mut residuals = DVector::<f64>::zeros(n);
    let mut chi2 = problem.linearize(&x, &observations, &mut jacobian, &mut residuals);
    if !chi2.is_finite() {
        return Err(NobleError::Fit(format!(
            "sample `{}`: model is not finite at the start values",
            sample.name
        )));
    }

    let mut lambda = settings.initial_lambda;
    let mut converged = p == 0;
    let mut iterations = 0usize;

    while !converged && iterations < settings.max_iterations {
        iterations += 1;

        let step = damped_step(&jacobian, &residuals, lambda);
        let trial = step.map(|step| {
            let mut trial = x.clone();
            for (k, &idx) in free.iter().enumerate() {
                trial[idx] += step[k];
            }
            problem.clamp(&mut trial);
            trial
        });
        let trial_chi2 = trial
            .as_ref()
            .map(|t| problem.chi2(t, &observations))
            .unwrap_or(f64::INFINITY);

        match trial {
            Some(trial) if trial_chi2.is_finite() && trial_chi2 <= chi2 => {
                let improvement = chi2 - trial_chi2;
                x = trial;
                chi2 = problem.linearize(&x, &observations, &mut jacobian, &mut residuals);
                lambda = (lambda / 10.0).max(MIN_LAMBDA);
                debug!(sample = %sample.name, iterations, chi2, lambda, "accepted step");
                if improvement <= settings.tolerance * (chi2 + settings.tolerance) {
                    converged = true;
                }
            }
            _ => {
                lambda *= 10.0;
                if lambda > MAX_LAMBDA {
                    // No downhill step left: we sit in a minimum (possibly on a bound).
                    converged = true;
                }
            }
        }
    }

    if !converged {
        warn!(sample = %sample.name, iterations, chi2, "fit did not converge");
    }

    Ok(finish(problem, sample, x, &observations, &jacobian, chi2, iterations, converged))
}

#[allow(clippy::too_many_arguments)]
fn finish(
    problem: &FitProblem,
    sample: &Sample,
    values: Vec<f64>,
    observations: &[Observation],
    jacobian: &DMatrix<f64>,
    chi2: f64,
    iterations: usize,
    converged: bool,
) -> SampleFit {
    let free = problem.free();
    let descriptors = problem.model().parameters().descriptors();
    let cov = if free.is_empty() { None } else { covariance(jacobian) };

    let estimates = free
        .iter()
        .enumerate()
        .map(|(k, &idx)| ParameterEstimate {
            name: descriptors[idx].name.clone(),
            unit: descriptors[idx].unit.clone(),
            value: values[idx],
            error: cov
                .as_ref()
                .map(|c| c[(k, k)])
                .filter(|variance| variance.is_finite())
                .map(|variance| variance.max(0.0).sqrt()),
        })
        .collect();

    let residuals = observations
        .iter()
        .map(|&(gas, data)| {
            let modelled = problem.model().concentration(&values, gas);
            GasResidual {
                gas,
                measured: data.value,
                error: data.error,
                modelled,
                residual: (modelled - data.value) / data.error,
            }
        })
        .collect();

    let dof = observations.len().saturating_sub(free.len());
    let probability = if dof > 0 {
        ChiSquared::new(dof as f64).ok().map(|dist| dist.sf(chi2))
    } else {
        None
    };

    SampleFit {
        sample: sample.name.clone(),
        values,
        estimates,
        residuals,
        chi2,
        dof,
        probability,
        iterations,
        converged,
    }
}

/// Fit every enabled sample in parallel.
///
/// Per-sample failures are collected instead of aborting the run.
pub fn fit_run(problem: &FitProblem, run: &RunData) -> Result<RunFit> {
    let samples: Vec<&Sample> = run.enabled_samples().collect();
    if samples.is_empty() {
        return Err(NobleError::Data("No enabled samples to fit.".to_string()));
    }

    let outcomes: Vec<(String, Result<SampleFit>)> = samples
        .par_iter()
        .map(|sample| (sample.name.clone(), fit_sample(problem, sample)))
        .collect();

    let mut result = RunFit::default();
    for (sample, outcome) in outcomes {
        match outcome {
            Ok(fit) => result.fits.push(fit),
            Err(e) => {
                warn!(sample = %sample, "fit failed: {e}");
                result.failures.push(SampleFailure {
                    sample,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(fitted = result.fits.len(), failed = result.failures.len(), "fit complete");
    Ok(result)
}
