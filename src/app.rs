//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - builds the model/method registries
//! - runs the requested command
//! - prints reports and writes optional exports

use std::env;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, FitArgs, ModelArgs};
use crate::domain::{FitConfig, GasType, ModelConfig};
use crate::error::Result;
use crate::io::export::{RunExport, write_results_csv, write_run_json};
use crate::registry::{MethodRegistry, ModelRegistry};

pub mod pipeline;

const DEFAULT_MODEL: &str = "UA";
const DEFAULT_METHOD: &str = "Weiss";

/// Entry point for the `noblefit` binary.
pub fn run() -> Result<()> {
    // A missing .env file is fine; the variables may come from the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let models = ModelRegistry::with_builtin();
    let methods = MethodRegistry::with_builtin();

    match cli.command {
        Command::Models => {
            print!("{}", crate::report::format_models(&models, &methods));
            Ok(())
        }
        Command::Forward(args) => {
            let config = model_config_from_args(&args.model);
            let output = pipeline::run_forward(&config, &models, &methods)?;
            print!("{}", crate::report::format_forward(&output));
            Ok(())
        }
        Command::Fit(args) => handle_fit(&args, &models, &methods),
    }
}

fn handle_fit(args: &FitArgs, models: &ModelRegistry, methods: &MethodRegistry) -> Result<()> {
    let config = fit_config_from_args(args);
    let run = pipeline::run_fit(&config, models, methods)?;

    print!("{}", crate::report::format_run_summary(&run));

    if let Some(path) = &config.export_results {
        write_results_csv(path, &run.result)?;
        info!(path = %path.display(), "wrote results CSV");
    }
    if let Some(path) = &config.export_json {
        let export = RunExport {
            created_at: Utc::now(),
            model: &config.model.model,
            method: &config.model.method,
            free: config.free.iter().map(String::as_str).collect(),
            settings: *run.problem.settings(),
            result: &run.result,
            monte_carlo: run.monte_carlo.as_deref(),
        };
        write_run_json(path, &export)?;
        info!(path = %path.display(), "wrote run JSON");
    }

    Ok(())
}

/// Resolve model/method names: command line, then environment, then defaults.
pub fn model_config_from_args(args: &ModelArgs) -> ModelConfig {
    let model = args
        .model
        .clone()
        .or_else(|| env::var("NOBLEFIT_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let method = args
        .method
        .clone()
        .or_else(|| env::var("NOBLEFIT_METHOD").ok())
        .unwrap_or_else(|| DEFAULT_METHOD.to_string());
    let gases = if args.gases.is_empty() {
        GasType::STANDARD.to_vec()
    } else {
        args.gases.clone()
    };

    ModelConfig {
        model,
        method,
        overrides: args.overrides.clone(),
        gases,
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        model: model_config_from_args(&args.model),
        free: args.free.clone(),
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
        monte_carlo: args.monte_carlo,
        seed: args.seed,
        export_results: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}
