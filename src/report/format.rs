//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays free of
//! presentation details and output changes stay localized.

use crate::app::pipeline::{ForwardOutput, RunOutput};
use crate::fit::{MonteCarloSummary, RunFit};
use crate::params::{ParameterDescriptor, ParameterSet};
use crate::registry::{MethodRegistry, ModelRegistry};

/// Registered models and methods with their own parameters.
pub fn format_models(models: &ModelRegistry, methods: &MethodRegistry) -> String {
    let mut out = String::new();

    out.push_str("Excess-air models:\n");
    for name in models.names() {
        let mut set = ParameterSet::new();
        if let Ok(model) = models.create(name, &mut set) {
            out.push_str(&format_entry(name, model.parameter_indices(), &set));
        }
    }

    out.push_str("\nEquilibrium methods:\n");
    for name in methods.names() {
        let mut set = ParameterSet::new();
        if let Ok(method) = methods.create(name, &mut set) {
            out.push_str(&format_entry(name, method.parameter_indices(), &set));
        }
    }

    out
}

fn format_entry(name: &str, indices: &[usize], set: &ParameterSet) -> String {
    let mut out = format!("  {name}\n");
    for &idx in indices {
        if let Ok(d) = set.get(idx) {
            out.push_str(&format!("    {}\n", format_descriptor(d)));
        }
    }
    out
}

fn format_descriptor(d: &ParameterDescriptor) -> String {
    let unit = if d.unit.is_empty() { String::new() } else { format!(" [{}]", d.unit) };
    format!(
        "{:<8} default={} bounds=[{}, {}]{unit}",
        d.name,
        fmt_num(d.default_value),
        fmt_num(d.lower_bound),
        fmt_num(d.upper_bound)
    )
}

/// Parameter values and predicted concentrations of a `forward` run.
pub fn format_forward(output: &ForwardOutput) -> String {
    let mut out = format!(
        "Model: {} | Method: {}\n",
        output.model.model().name(),
        output.model.method().name()
    );
    for (d, value) in output.model.parameters().descriptors().iter().zip(&output.values) {
        out.push_str(&format!("  {:<8} = {}\n", d.name, fmt_num(*value)));
    }

    out.push('\n');
    out.push_str(&format!("{:<4} {:>14} {:>14}\n", "gas", "c_eq", "C"));
    out.push_str(&format!("{:-<4} {:-<14} {:-<14}\n", "", "", ""));
    for row in &output.rows {
        out.push_str(&format!(
            "{:<4} {:>14.6e} {:>14.6e}\n",
            row.gas.symbol(),
            row.equilibrium,
            row.concentration
        ));
    }
    out
}

/// Run header (input, model choice, sample counts) followed by the fit table.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    let model = run.problem.model();

    out.push_str("=== noblefit ===\n");
    out.push_str(&format!(
        "Model: {} | Method: {}\n",
        model.model().name(),
        model.method().name()
    ));
    let gases: Vec<&str> = run.problem.gases().iter().map(|g| g.symbol()).collect();
    out.push_str(&format!("Gases: {}\n", gases.join(",")));
    out.push_str(&format!(
        "Samples: rows={} used={} enabled={} skipped={}\n",
        run.ingest.rows_read,
        run.ingest.rows_used,
        run.ingest.run.enabled_size(),
        run.ingest.row_errors.len()
    ));
    out.push('\n');
    out.push_str(&format_fit_table(&run.result));

    if let Some(summaries) = &run.monte_carlo {
        out.push('\n');
        out.push_str(&format_monte_carlo(summaries));
    }
    out
}

/// One line per sample: free parameter values ± 1σ, χ² and probability.
pub fn format_fit_table(result: &RunFit) -> String {
    let mut out = String::new();
    let Some(first) = result.fits.first() else {
        out.push_str("No successful fits.\n");
        return append_failures(out, result);
    };

    let mut header = format!("{:<16}", "sample");
    for estimate in &first.estimates {
        header.push_str(&format!(" {:>26}", estimate.name));
    }
    header.push_str(&format!(" {:>10} {:>4} {:>8}", "chi2", "dof", "p"));
    out.push_str(header.trim_end());
    out.push('\n');

    for fit in &result.fits {
        let mut line = format!("{:<16}", truncate(&fit.sample, 16));
        for estimate in &fit.estimates {
            let error = estimate.error.map(fmt_num).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {:>26}", format!("{} ± {error}", fmt_num(estimate.value))));
        }
        let p = fit.probability.map(|p| format!("{p:.4}")).unwrap_or_else(|| "-".to_string());
        let flag = if fit.converged { "" } else { " (not converged)" };
        line.push_str(&format!(" {:>10.4} {:>4} {:>8}{flag}", fit.chi2, fit.dof, p));
        out.push_str(line.trim_end());
        out.push('\n');
    }

    append_failures(out, result)
}

fn append_failures(mut out: String, result: &RunFit) -> String {
    for failure in &result.failures {
        out.push_str(&format!("  (failed {}) {}\n", failure.sample, failure.message));
    }
    out
}

pub fn format_monte_carlo(summaries: &[MonteCarloSummary]) -> String {
    let mut out = String::from("Monte Carlo (mean ± std):\n");
    for summary in summaries {
        let parts: Vec<String> = summary
            .estimates
            .iter()
            .map(|e| format!("{}={} ± {}", e.name, fmt_num(e.mean), fmt_num(e.std_dev)))
            .collect();
        out.push_str(&format!(
            "  {:<16} {} ({}/{})\n",
            truncate(&summary.sample, 16),
            parts.join(" "),
            summary.successful,
            summary.realizations
        ));
    }
    out
}

/// Fixed notation for ordinary magnitudes, scientific otherwise.
fn fmt_num(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs();
    if (1e-3..1e5).contains(&magnitude) {
        format!("{v:.4}")
    } else {
        format!("{v:.4e}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{ParameterEstimate, SampleFailure, SampleFit};

    #[test]
    fn models_listing_names_every_parameter() {
        let text = format_models(&ModelRegistry::with_builtin(), &MethodRegistry::with_builtin());
        for name in ["UA", "PR", "PD", "CE", "OD", "GR", "Weiss", "Jenkins"] {
            assert!(text.contains(&format!("  {name}\n")), "missing {name}");
        }
        assert!(text.contains("F_GR"));
        assert!(text.contains("beta_GR"));
        assert!(text.contains("bounds=[0, inf]"));
    }

    #[test]
    fn fit_table_lists_fits_and_failures() {
        let result = RunFit {
            fits: vec![SampleFit {
                sample: "a-very-long-sample-name".to_string(),
                values: vec![0.005],
                estimates: vec![ParameterEstimate {
                    name: "A".to_string(),
                    unit: String::new(),
                    value: 0.005,
                    error: None,
                }],
                residuals: Vec::new(),
                chi2: 1.5,
                dof: 2,
                probability: Some(0.47),
                iterations: 3,
                converged: false,
            }],
            failures: vec![SampleFailure {
                sample: "S9".to_string(),
                message: "boom".to_string(),
            }],
        };

        let text = format_fit_table(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("sample"));
        assert!(lines[1].starts_with("a-very-long-sam."));
        assert!(lines[1].contains("0.0050 ± -"));
        assert!(lines[1].ends_with("(not converged)"));
        assert_eq!(lines[2], "  (failed S9) boom");
    }

    #[test]
    fn numbers_switch_to_scientific_outside_ordinary_range() {
        assert_eq!(fmt_num(12.5), "12.5000");
        assert_eq!(fmt_num(4.4e-8), "4.4000e-8");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(f64::INFINITY), "inf");
    }
}
