use std::path::PathBuf;

use serde::Serialize;

use super::GasType;

/// Model selection and parameter overrides, shared by `forward` and `fit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub model: String,
    pub method: String,
    /// `(name, value)` pairs applied on top of the parameter defaults.
    pub overrides: Vec<(String, f64)>,
    pub gases: Vec<GasType>,
}

/// Resolved configuration of one `fit` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitConfig {
    pub input: PathBuf,
    pub model: ModelConfig,
    /// Names of the parameters to vary.
    pub free: Vec<String>,

    pub max_iterations: usize,
    pub tolerance: f64,

    /// Monte Carlo realizations per sample; 0 disables.
    pub monte_carlo: usize,
    pub seed: u64,

    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
