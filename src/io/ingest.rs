//! CSV ingest of measured noble gas concentrations.
//!
//! Expected layout: one row per sample, a `name` column, an optional
//! `enabled` column, and a `<Gas>` / `<Gas>_err` column pair per measured gas
//! (`He`, `Ne`, `Ar`, `Kr`, `Xe`, `He3`). Header matching is case-insensitive
//! and accepts the isotope spellings `3He` and `He4`/`4He`.
//! An empty value cell means the gas was not measured for that sample.
//!
//! Rows that fail to parse are skipped and reported; schema problems and
//! duplicate sample names abort the load.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::data::{RunData, Sample};
use crate::domain::{Data, GasType, SampleConcentrations};
use crate::error::{NobleError, Result};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub name: Option<String>,
    pub message: String,
}

/// Ingest output: samples plus row bookkeeping.
#[derive(Debug)]
pub struct IngestedData {
    pub run: RunData,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone)]
struct Schema {
    name: usize,
    enabled: Option<usize>,
    gases: BTreeMap<GasType, GasColumns>,
}

#[derive(Debug, Clone, Copy)]
struct GasColumns {
    value: usize,
    error: usize,
}

/// Load a sample CSV from disk.
pub fn load_run_data(path: &Path) -> Result<IngestedData> {
    let file = File::open(path).map_err(|e| NobleError::io(path, e))?;
    let ingested = read_run_data(file)?;
    info!(
        path = %path.display(),
        samples = ingested.rows_used,
        skipped = ingested.row_errors.len(),
        "loaded samples"
    );
    Ok(ingested)
}

/// Parse samples from any CSV source.
pub fn read_run_data<R: Read>(source: R) -> Result<IngestedData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let schema = resolve_schema(&headers)?;

    let mut samples = Vec::new();
    let mut seen = HashSet::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    name: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &schema) {
            Ok(sample) => {
                if !seen.insert(sample.name.clone()) {
                    return Err(NobleError::DuplicateSample(sample.name));
                }
                samples.push(sample);
            }
            Err(message) => row_errors.push(RowError {
                line,
                name: get_optional(&record, schema.name).map(str::to_string),
                message,
            }),
        }
    }

    for e in &row_errors {
        warn!(line = e.line, name = e.name.as_deref().unwrap_or("-"), "skipped row: {}", e.message);
    }

    let rows_used = samples.len();
    if rows_used == 0 {
        return Err(NobleError::Data("No valid sample rows in input.".to_string()));
    }

    Ok(IngestedData {
        run: RunData::new(samples),
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often put a BOM in front of the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_schema(headers: &StringRecord) -> Result<Schema> {
    let header_map = build_header_map(headers);

    let name = *header_map
        .get("name")
        .ok_or_else(|| NobleError::Data("Missing required column: `name`".to_string()))?;
    let enabled = header_map.get("enabled").copied();

    // Any spelling `GasType` accepts (`He3`, `3He`, `He4`, ...) names a gas column.
    let mut values: BTreeMap<GasType, usize> = BTreeMap::new();
    let mut errors: BTreeMap<GasType, usize> = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let key = normalize_header_name(header);
        let (stem, columns) = match key.strip_suffix("_err") {
            Some(stem) => (stem, &mut errors),
            None => (key.as_str(), &mut values),
        };
        let Ok(gas) = stem.parse::<GasType>() else {
            continue;
        };
        if columns.insert(gas, idx).is_some() {
            return Err(NobleError::Data(format!(
                "Column `{}` names {gas} a second time.",
                header.trim()
            )));
        }
    }

    let mut gases = BTreeMap::new();
    for gas in GasType::ALL {
        match (values.get(&gas).copied(), errors.get(&gas).copied()) {
            (Some(value), Some(error)) => {
                gases.insert(gas, GasColumns { value, error });
            }
            (Some(_), None) => {
                return Err(NobleError::Data(format!(
                    "Column `{gas}` needs a matching `{gas}_err` column."
                )));
            }
            (None, Some(_)) => {
                return Err(NobleError::Data(format!(
                    "Column `{gas}_err` has no matching `{gas}` column."
                )));
            }
            (None, None) => {}
        }
    }

    if gases.is_empty() {
        return Err(NobleError::Data(
            "No gas columns found (expected e.g. `Ne` and `Ne_err`).".to_string(),
        ));
    }

    Ok(Schema { name, enabled, gases })
}

fn parse_row(record: &StringRecord, schema: &Schema) -> std::result::Result<Sample, String> {
    let name = get_optional(record, schema.name)
        .ok_or_else(|| "Missing required value: `name`".to_string())?
        .to_string();

    let enabled = match schema.enabled.and_then(|idx| get_optional(record, idx)) {
        Some(raw) => parse_bool(raw)?,
        None => true,
    };

    let mut concentrations = SampleConcentrations::new();
    for (&gas, columns) in &schema.gases {
        let Some(raw_value) = get_optional(record, columns.value) else {
            continue;
        };
        let value = parse_f64(raw_value).ok_or_else(|| format!("Invalid `{gas}` value '{raw_value}'."))?;
        let raw_error =
            get_optional(record, columns.error).ok_or_else(|| format!("Missing `{gas}_err` for measured `{gas}`."))?;
        let error = parse_f64(raw_error).ok_or_else(|| format!("Invalid `{gas}_err` value '{raw_error}'."))?;
        if error <= 0.0 {
            return Err(format!("`{gas}_err` must be > 0."));
        }
        concentrations.insert(gas, Data::new(value, error));
    }

    Ok(Sample {
        name,
        concentrations,
        enabled,
    })
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(format!("Invalid `enabled` value '{s}'.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<IngestedData> {
        read_run_data(csv.as_bytes())
    }

    #[test]
    fn reads_samples_in_file_order() {
        let data = read(
            "\u{feff}Name,He,He_err,NE,ne_err,enabled\n\
             S1,4.5e-8,1e-9,2.0e-7,5e-9,\n\
             S2,,,1.9e-7,5e-9,no\n",
        )
        .unwrap();

        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 2);
        let samples = data.run.samples();
        assert_eq!(samples[0].name, "S1");
        assert_eq!(samples[0].measured(GasType::He), Some(Data::new(4.5e-8, 1e-9)));
        assert!(samples[0].enabled);
        assert_eq!(samples[1].measured(GasType::He), None);
        assert!(!samples[1].enabled);
        assert_eq!(data.run.enabled_size(), 1);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let data = read(
            "name,Ar,Ar_err\n\
             good,3.8e-4,4e-6\n\
             bad,abc,4e-6\n\
             noerr,3.8e-4,\n\
             ,3.8e-4,4e-6\n",
        )
        .unwrap();

        assert_eq!(data.rows_used, 1);
        assert_eq!(data.row_errors.len(), 3);
        assert_eq!(data.row_errors[0].line, 3);
        assert_eq!(data.row_errors[0].name.as_deref(), Some("bad"));
        assert_eq!(data.row_errors[2].name, None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = read("name,Ne,Ne_err\nS1,2e-7,5e-9\nS1,2e-7,5e-9\n").unwrap_err();
        assert!(matches!(err, NobleError::DuplicateSample(name) if name == "S1"));
    }

    #[test]
    fn schema_problems_abort() {
        assert!(matches!(read("id,Ne,Ne_err\nS1,1,1\n"), Err(NobleError::Data(_))));
        assert!(matches!(read("name,Ne\nS1,1\n"), Err(NobleError::Data(_))));
        assert!(matches!(read("name,comment\nS1,x\n"), Err(NobleError::Data(_))));
        assert!(matches!(read("name,Ne,Ne_err\nS1,x,1\n"), Err(NobleError::Data(_))));
    }

    #[test]
    fn isotope_spellings_name_gas_columns() {
        let data = read("name,Ne,Ne_err,3He,3He_err,4He,4He_err\nS1,2e-7,5e-9,6e-14,1e-15,4.5e-8,1e-9\n").unwrap();
        let sample = &data.run.samples()[0];
        assert_eq!(sample.measured(GasType::He3), Some(Data::new(6e-14, 1e-15)));
        assert_eq!(sample.measured(GasType::He), Some(Data::new(4.5e-8, 1e-9)));
        assert_eq!(sample.measured(GasType::Ne), Some(Data::new(2e-7, 5e-9)));
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn two_columns_for_the_same_gas_are_rejected() {
        assert!(matches!(
            read("name,He3,He3_err,3He,3He_err\nS1,6e-14,1e-15,6e-14,1e-15\n"),
            Err(NobleError::Data(_))
        ));
        assert!(matches!(
            read("name,He,He_err,He4_err\nS1,4.5e-8,1e-9,1e-9\n"),
            Err(NobleError::Data(_))
        ));
    }
}
