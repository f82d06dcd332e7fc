//! Monte Carlo error estimation.
//!
//! Every realization perturbs the measured concentrations of a sample with
//! `Normal(0, σ)` noise and refits it. The spread of the refitted values is
//! the error estimate; it also captures non-linear effects the covariance
//! matrix misses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::fitter::fit_sample;
use super::problem::FitProblem;
use crate::data::{RunData, Sample};
use crate::error::{NobleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonteCarloSettings {
    pub realizations: usize,
    pub seed: u64,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            realizations: 200,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloEstimate {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloSummary {
    pub sample: String,
    pub realizations: usize,
    /// Realizations whose refit converged; only these enter the estimates.
    pub successful: usize,
    pub estimates: Vec<MonteCarloEstimate>,
}

/// Run the Monte Carlo refits of one sample.
///
/// The noise stream depends only on the seed and the sample name, so results
/// do not change with thread scheduling.
pub fn monte_carlo_sample(
    problem: &FitProblem,
    sample: &Sample,
    settings: &MonteCarloSettings,
) -> Result<MonteCarloSummary> {
    if settings.realizations < 2 {
        return Err(NobleError::InvalidArgument(
            "Monte Carlo needs at least 2 realizations".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(settings.seed, &sample.name));
    let noise = sample
        .concentrations
        .iter()
        .map(|(&gas, data)| {
            Normal::new(0.0, data.error)
                .map(|dist| (gas, dist))
                .map_err(|e| NobleError::Fit(format!("noise distribution for {gas}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let free = problem.free();
    let mut draws: Vec<Vec<f64>> = Vec::with_capacity(settings.realizations);
    for realization in 0..settings.realizations {
        let mut perturbed = sample.clone();
        for (gas, dist) in &noise {
            if let Some(data) = perturbed.concentrations.get_mut(gas) {
                data.value += dist.sample(&mut rng);
            }
        }
        match fit_sample(problem, &perturbed) {
            Ok(fit) if fit.converged => draws.push(free.iter().map(|&idx| fit.values[idx]).collect()),
            Ok(fit) => debug!(sample = %sample.name, realization, iterations = fit.iterations, "refit did not converge"),
            Err(e) => debug!(sample = %sample.name, realization, "refit failed: {e}"),
        }
    }

    if draws.len() < 2 {
        return Err(NobleError::Fit(format!(
            "sample `{}`: fewer than 2 converged Monte Carlo refits",
            sample.name
        )));
    }

    let descriptors = problem.model().parameters().descriptors();
    let estimates = free
        .iter()
        .enumerate()
        .map(|(k, &idx)| {
            let (mean, std_dev) = mean_and_std(draws.iter().map(|d| d[k]));
            MonteCarloEstimate {
                name: descriptors[idx].name.clone(),
                mean,
                std_dev,
            }
        })
        .collect();

    Ok(MonteCarloSummary {
        sample: sample.name.clone(),
        realizations: settings.realizations,
        successful: draws.len(),
        estimates,
    })
}

/// Monte Carlo for every enabled sample, in parallel over samples.
pub fn monte_carlo_run(
    problem: &FitProblem,
    run: &RunData,
    settings: &MonteCarloSettings,
) -> Result<Vec<MonteCarloSummary>> {
    let samples: Vec<&Sample> = run.enabled_samples().collect();
    if samples.is_empty() {
        return Err(NobleError::Data("No enabled samples to fit.".to_string()));
    }

    let summaries: Vec<Result<MonteCarloSummary>> = samples
        .par_iter()
        .map(|sample| monte_carlo_sample(problem, sample, settings))
        .collect();

    Ok(summaries
        .into_iter()
        .filter_map(|summary| summary.map_err(|e| warn!("Monte Carlo skipped: {e}")).ok())
        .collect())
}

fn sample_seed(seed: u64, name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    name.hash(&mut hasher);
    hasher.finish()
}

/// Mean and sample standard deviation (n − 1).
fn mean_and_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count() as f64;
    let mean = values.clone().sum::<f64>() / n;
    let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concentration::ConcentrationModel;
    use crate::fit::FitSettings;
    use crate::domain::{GasType, SampleConcentrations};
    use crate::registry::{MethodRegistry, ModelRegistry};

    fn problem() -> FitProblem {
        let model = ConcentrationModel::from_registries(
            &MethodRegistry::with_builtin(),
            "Weiss",
            &ModelRegistry::with_builtin(),
            "UA",
        )
        .unwrap();
        let free = model.parameters().indices_of(["A", "T"]).unwrap();
        let start = model.parameters().defaults();
        FitProblem::new(model, &free, start, GasType::STANDARD.to_vec()).unwrap()
    }

    fn sample(problem: &FitProblem) -> Sample {
        let params = problem.model().parameters();
        let mut truth = problem.start().to_vec();
        truth[params.index_of("A").unwrap()] = 0.004;
        truth[params.index_of("T").unwrap()] = 9.0;
        let mut sample = Sample::new("MC", SampleConcentrations::new());
        for gas in GasType::STANDARD {
            let c = problem.model().concentration(&truth, gas);
            sample = sample.with_gas(gas, c, 0.005 * c);
        }
        sample
    }

    #[test]
    fn same_seed_gives_identical_summaries() {
        let problem = problem();
        let sample = sample(&problem);
        let settings = MonteCarloSettings { realizations: 20, seed: 7 };

        let first = monte_carlo_sample(&problem, &sample, &settings).unwrap();
        let second = monte_carlo_sample(&problem, &sample, &settings).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.successful, 20);
    }

    #[test]
    fn spread_brackets_the_true_values() {
        let problem = problem();
        let sample = sample(&problem);
        let settings = MonteCarloSettings { realizations: 60, seed: 11 };

        let summary = monte_carlo_sample(&problem, &sample, &settings).unwrap();
        assert_eq!(summary.estimates[0].name, "A");
        for (estimate, truth) in summary.estimates.iter().zip([0.004, 9.0]) {
            assert!(estimate.std_dev > 0.0);
            assert!((estimate.mean - truth).abs() < 3.0 * estimate.std_dev, "{estimate:?}");
        }
    }

    #[test]
    fn too_few_realizations_is_rejected() {
        let problem = problem();
        let sample = sample(&problem);
        let settings = MonteCarloSettings { realizations: 1, seed: 0 };
        assert!(matches!(
            monte_carlo_sample(&problem, &sample, &settings),
            Err(NobleError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unconverged_refits_are_left_out() {
        let problem = problem();
        let sample = sample(&problem);
        // One iteration from the defaults cannot reach the optimum.
        let truncated = FitProblem::new(
            ConcentrationModel::from_registries(
                &MethodRegistry::with_builtin(),
                "Weiss",
                &ModelRegistry::with_builtin(),
                "UA",
            )
            .unwrap(),
            problem.free(),
            problem.start().to_vec(),
            GasType::STANDARD.to_vec(),
        )
        .unwrap()
        .with_settings(FitSettings {
            max_iterations: 1,
            ..FitSettings::default()
        });
        assert!(!fit_sample(&truncated, &sample).unwrap().converged);

        let settings = MonteCarloSettings { realizations: 10, seed: 3 };
        assert!(matches!(
            monte_carlo_sample(&truncated, &sample, &settings),
            Err(NobleError::Fit(_))
        ));
    }

    #[test]
    fn mean_and_std_of_known_values() {
        let (mean, std) = mean_and_std([1.0, 2.0, 3.0, 4.0].into_iter());
        assert_eq!(mean, 2.5);
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }
}
