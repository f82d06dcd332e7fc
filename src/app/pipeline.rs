//! Shared pipeline logic behind the `forward` and `fit` commands.
//!
//! CSV ingest -> model construction -> per-sample fits -> optional Monte Carlo
//!
//! The commands then only deal with presentation and exports.

use tracing::info;

use crate::concentration::ConcentrationModel;
use crate::domain::{FitConfig, GasType, ModelConfig};
use crate::error::{NobleError, Result};
use crate::fit::{FitProblem, FitSettings, MonteCarloSettings, MonteCarloSummary, RunFit, fit_run, monte_carlo_run};
use crate::io::ingest::{IngestedData, load_run_data};
use crate::registry::{MethodRegistry, ModelRegistry};

/// Predicted concentrations of one gas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardRow {
    pub gas: GasType,
    pub equilibrium: f64,
    pub concentration: f64,
}

#[derive(Debug)]
pub struct ForwardOutput {
    pub model: ConcentrationModel,
    pub values: Vec<f64>,
    pub rows: Vec<ForwardRow>,
}

/// All computed outputs of a single `noblefit fit` run.
#[derive(Debug)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub problem: FitProblem,
    pub result: RunFit,
    pub monte_carlo: Option<Vec<MonteCarloSummary>>,
}

/// Build the model combination and its parameter vector (defaults plus overrides).
pub fn build_model(
    config: &ModelConfig,
    models: &ModelRegistry,
    methods: &MethodRegistry,
) -> Result<(ConcentrationModel, Vec<f64>)> {
    let model = ConcentrationModel::from_registries(methods, &config.method, models, &config.model)?;
    let mut values = model.parameters().defaults();
    for (name, value) in &config.overrides {
        let idx = model.parameters().index_of(name)?;
        let descriptor = model.parameters().get(idx)?;
        if !descriptor.contains(*value) {
            return Err(NobleError::InvalidArgument(format!(
                "{name}={value} is outside [{}, {}]",
                descriptor.lower_bound, descriptor.upper_bound
            )));
        }
        values[idx] = *value;
    }
    Ok((model, values))
}

/// Evaluate the configured model for every selected gas.
pub fn run_forward(config: &ModelConfig, models: &ModelRegistry, methods: &MethodRegistry) -> Result<ForwardOutput> {
    let (model, values) = build_model(config, models, methods)?;
    let rows = config
        .gases
        .iter()
        .map(|&gas| ForwardRow {
            gas,
            equilibrium: model.equilibrium(&values, gas),
            concentration: model.concentration(&values, gas),
        })
        .collect();
    Ok(ForwardOutput { model, values, rows })
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig, models: &ModelRegistry, methods: &MethodRegistry) -> Result<RunOutput> {
    let ingest = load_run_data(&config.input)?;
    run_fit_with_data(config, ingest, models, methods)
}

/// Execute the fitting pipeline on already loaded samples.
pub fn run_fit_with_data(
    config: &FitConfig,
    ingest: IngestedData,
    models: &ModelRegistry,
    methods: &MethodRegistry,
) -> Result<RunOutput> {
    let (model, start) = build_model(&config.model, models, methods)?;
    let free = model
        .parameters()
        .indices_of(config.free.iter().map(String::as_str))?;

    let problem = FitProblem::new(model, &free, start, config.model.gases.clone())?.with_settings(FitSettings {
        max_iterations: config.max_iterations,
        tolerance: config.tolerance,
        ..FitSettings::default()
    });

    info!(
        model = %config.model.model,
        method = %config.model.method,
        free = ?config.free,
        samples = ingest.run.enabled_size(),
        "fitting"
    );
    let result = fit_run(&problem, &ingest.run)?;

    let monte_carlo = if config.monte_carlo > 0 {
        let settings = MonteCarloSettings {
            realizations: config.monte_carlo,
            seed: config.seed,
        };
        Some(monte_carlo_run(&problem, &ingest.run, &settings)?)
    } else {
        None
    };

    Ok(RunOutput {
        ingest,
        problem,
        result,
        monte_carlo,
    })
}
