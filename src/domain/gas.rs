//! Gas species and per-gas measurement values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NobleError;

/// Noble gas species handled by the models.
///
/// The declaration order is the total order used for map keys and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GasType {
    He,
    Ne,
    Ar,
    Kr,
    Xe,
    /// Helium-3. Shares the helium diffusion behavior.
    He3,
}

impl GasType {
    pub const ALL: [GasType; 6] = [
        GasType::He,
        GasType::Ne,
        GasType::Ar,
        GasType::Kr,
        GasType::Xe,
        GasType::He3,
    ];

    /// The five stable noble gases usually fitted together.
    pub const STANDARD: [GasType; 5] = [GasType::He, GasType::Ne, GasType::Ar, GasType::Kr, GasType::Xe];

    pub fn symbol(self) -> &'static str {
        match self {
            GasType::He => "He",
            GasType::Ne => "Ne",
            GasType::Ar => "Ar",
            GasType::Kr => "Kr",
            GasType::Xe => "Xe",
            GasType::He3 => "He3",
        }
    }

    /// Species used for diffusion-coefficient lookups.
    ///
    /// Diffusion is treated as isotope-insensitive, so `He3` maps onto `He`.
    pub fn diffusion_species(self) -> GasType {
        match self {
            GasType::He3 => GasType::He,
            other => other,
        }
    }
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for GasType {
    type Err = NobleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "he" | "he4" | "4he" => Ok(GasType::He),
            "ne" => Ok(GasType::Ne),
            "ar" => Ok(GasType::Ar),
            "kr" => Ok(GasType::Kr),
            "xe" => Ok(GasType::Xe),
            "he3" | "3he" => Ok(GasType::He3),
            _ => Err(NobleError::InvalidArgument(format!("unknown gas `{s}`"))),
        }
    }
}

/// A measured value with its 1σ uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub value: f64,
    pub error: f64,
}

impl Data {
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }
}

/// Measured concentrations of one sample. Gases that are absent were not measured.
pub type SampleConcentrations = BTreeMap<GasType, Data>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_declaration() {
        let mut gases = vec![GasType::Xe, GasType::He3, GasType::He, GasType::Ar];
        gases.sort();
        assert_eq!(gases, vec![GasType::He, GasType::Ar, GasType::Xe, GasType::He3]);
    }

    #[test]
    fn parses_symbols_case_insensitively() {
        assert_eq!("NE".parse::<GasType>().unwrap(), GasType::Ne);
        assert_eq!("3He".parse::<GasType>().unwrap(), GasType::He3);
        assert!("Rn".parse::<GasType>().is_err());
    }

    #[test]
    fn helium_isotopes_share_diffusion_species() {
        assert_eq!(GasType::He3.diffusion_species(), GasType::He);
        assert_eq!(GasType::Kr.diffusion_species(), GasType::Kr);
    }
}
