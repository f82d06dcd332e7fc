//! Command-line parsing for the noble gas fitter.
//!
//! Argument parsing and command dispatch stay separate from the modeling code;
//! `app` turns parsed arguments into a [`FitConfig`](crate::domain::FitConfig).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::GasType;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "noblefit", version, about = "Noble gas excess-air model fitter")]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered excess-air models and equilibrium methods with their parameters.
    Models,
    /// Evaluate concentrations for given parameter values.
    Forward(ForwardArgs),
    /// Fit every enabled sample of a CSV file.
    Fit(FitArgs),
}

/// Model selection shared by `forward` and `fit`.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Excess-air model (default: $NOBLEFIT_MODEL or UA).
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Equilibrium method (default: $NOBLEFIT_METHOD or Weiss).
    #[arg(long)]
    pub method: Option<String>,

    /// Override a parameter value, e.g. `--set T=12.5` (repeatable).
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub overrides: Vec<(String, f64)>,

    /// Gases to use, comma separated (default: He,Ne,Ar,Kr,Xe).
    #[arg(long, value_delimiter = ',', value_parser = parse_gas)]
    pub gases: Vec<GasType>,
}

#[derive(Debug, Args, Clone)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Sample CSV (`name`, optional `enabled`, `<Gas>` and `<Gas>_err` columns).
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Free parameters, comma separated (e.g. `A,T`).
    #[arg(long = "fit", value_delimiter = ',', default_value = "A,T")]
    pub free: Vec<String>,

    /// Iteration limit per sample.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Relative χ² improvement below which a fit counts as converged.
    #[arg(long, default_value_t = 1e-10)]
    pub tolerance: f64,

    /// Monte Carlo realizations per sample (0 disables).
    #[arg(long, default_value_t = 0)]
    pub monte_carlo: usize,

    /// Seed for Monte Carlo noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export per-sample results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full run to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in `{s}`"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value in `{s}`: {e}"))?;
    Ok((name.to_string(), value))
}

fn parse_gas(s: &str) -> Result<GasType, String> {
    s.parse::<GasType>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_command() {
        let cli = Cli::try_parse_from([
            "noblefit",
            "--log-level",
            "debug",
            "fit",
            "samples.csv",
            "--model",
            "GR",
            "--set",
            "S=0.5",
            "--set",
            "p = 0.95",
            "--fit",
            "A,F_GR,T",
            "--gases",
            "ne,Ar,kr",
        ])
        .unwrap();

        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input, PathBuf::from("samples.csv"));
        assert_eq!(args.model.model.as_deref(), Some("GR"));
        assert_eq!(args.model.method, None);
        assert_eq!(args.model.overrides, vec![("S".to_string(), 0.5), ("p".to_string(), 0.95)]);
        assert_eq!(args.free, vec!["A", "F_GR", "T"]);
        assert_eq!(args.model.gases, vec![GasType::Ne, GasType::Ar, GasType::Kr]);
        assert_eq!(args.monte_carlo, 0);
    }

    #[test]
    fn rejects_malformed_assignments_and_gases() {
        assert!(parse_assignment("T").is_err());
        assert!(parse_assignment("=3").is_err());
        assert!(parse_assignment("T=warm").is_err());
        assert!(Cli::try_parse_from(["noblefit", "forward", "--gases", "He,Rn"]).is_err());
    }

    #[test]
    fn models_needs_no_arguments() {
        let cli = Cli::try_parse_from(["noblefit", "models"]).unwrap();
        assert!(matches!(cli.command, Command::Models));
        assert_eq!(cli.log_level, tracing::Level::WARN);
    }
}
