//! Compiled-in atmospheric properties of the noble gases.
//!
//! Volume fractions are for dry air (Ozima & Podosek, 2002).

use super::GasType;

/// Atmospheric ³He/⁴He ratio.
pub const ATMOSPHERIC_HE3_RATIO: f64 = 1.384e-6;

/// Solubility isotope fractionation of ³He relative to ⁴He.
pub const HE3_SOLUBILITY_FRACTIONATION: f64 = 0.983;

/// Molar volume of an ideal gas at STP in cm³/mol.
pub const MOLAR_VOLUME_STP: f64 = 22414.0;

/// Conversion between atm and bar.
pub const ATM_IN_BAR: f64 = 1.01325;

/// Dry-air volume fraction `z` of a gas.
pub fn dry_air_fraction(gas: GasType) -> f64 {
    match gas {
        GasType::He => 5.24e-6,
        GasType::Ne => 1.818e-5,
        GasType::Ar => 9.34e-3,
        GasType::Kr => 1.14e-6,
        GasType::Xe => 8.7e-8,
        GasType::He3 => 5.24e-6 * ATMOSPHERIC_HE3_RATIO,
    }
}
