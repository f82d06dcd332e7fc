//! Export fit results.
//!
//! - CSV: one row per fitted sample, easy to consume in spreadsheets
//! - JSON: the full run (configuration, fits, failures, Monte Carlo)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{NobleError, Result};
use crate::fit::{FitSettings, MonteCarloSummary, RunFit};

/// Everything worth keeping from one `noblefit fit` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunExport<'a> {
    pub created_at: DateTime<Utc>,
    pub model: &'a str,
    pub method: &'a str,
    pub free: Vec<&'a str>,
    pub settings: FitSettings,
    pub result: &'a RunFit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<&'a [MonteCarloSummary]>,
}

/// Per-sample results as CSV: `sample`, then `<param>`/`<param>_err` per
/// free parameter, then `chi2`, `dof`, `probability`, `converged`.
pub fn write_results_csv(path: &Path, result: &RunFit) -> Result<()> {
    let file = File::create(path).map_err(|e| NobleError::io(path, e))?;
    write_results_csv_to(file, result)
}

pub fn write_results_csv_to<W: Write>(writer: W, result: &RunFit) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let names: Vec<&str> = result
        .fits
        .first()
        .map(|fit| fit.estimates.iter().map(|e| e.name.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec!["sample".to_string()];
    for name in &names {
        header.push((*name).to_string());
        header.push(format!("{name}_err"));
    }
    header.extend(["chi2", "dof", "probability", "converged"].map(str::to_string));
    wtr.write_record(&header)?;

    for fit in &result.fits {
        let mut row = vec![fit.sample.clone()];
        for estimate in &fit.estimates {
            row.push(format!("{:.10e}", estimate.value));
            row.push(estimate.error.map(|e| format!("{e:.10e}")).unwrap_or_default());
        }
        row.push(format!("{:.6}", fit.chi2));
        row.push(fit.dof.to_string());
        row.push(fit.probability.map(|p| format!("{p:.6}")).unwrap_or_default());
        row.push(fit.converged.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|e| NobleError::Csv(e.into()))?;
    Ok(())
}

/// Full run as pretty-printed JSON.
pub fn write_run_json(path: &Path, export: &RunExport<'_>) -> Result<()> {
    let file = File::create(path).map_err(|e| NobleError::io(path, e))?;
    serde_json::to_writer_pretty(file, export)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GasType;
    use crate::fit::{GasResidual, ParameterEstimate, SampleFailure, SampleFit};

    fn result() -> RunFit {
        RunFit {
            fits: vec![SampleFit {
                sample: "S1".to_string(),
                values: vec![10.0, 0.0, 1.0, 0.005],
                estimates: vec![ParameterEstimate {
                    name: "A".to_string(),
                    unit: "cm³STP/g".to_string(),
                    value: 0.005,
                    error: Some(0.0001),
                }],
                residuals: vec![GasResidual {
                    gas: GasType::Ne,
                    measured: 2.0e-7,
                    error: 2.0e-9,
                    modelled: 2.01e-7,
                    residual: 0.5,
                }],
                chi2: 0.25,
                dof: 0,
                probability: None,
                iterations: 4,
                converged: true,
            }],
            failures: vec![SampleFailure {
                sample: "S2".to_string(),
                message: "no gases".to_string(),
            }],
        }
    }

    #[test]
    fn csv_has_one_column_pair_per_free_parameter() {
        let mut buf = Vec::new();
        write_results_csv_to(&mut buf, &result()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("sample,A,A_err,chi2,dof,probability,converged"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("S1,5.0000000000e-3,1.0000000000e-4,0.250000,0,,true"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_export_carries_configuration_and_results() {
        let result = result();
        let export = RunExport {
            created_at: Utc::now(),
            model: "UA",
            method: "Weiss",
            free: vec!["A"],
            settings: FitSettings::default(),
            result: &result,
            monte_carlo: None,
        };
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["model"], "UA");
        assert_eq!(value["result"]["fits"][0]["residuals"][0]["gas"], "Ne");
        assert_eq!(value["result"]["failures"][0]["sample"], "S2");
        assert!(value.get("monte_carlo").is_none());
    }
}
