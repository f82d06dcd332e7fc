//! Molecular diffusivities of the noble gases in water.
//!
//! Arrhenius fits `D = A · exp(-Ea / (R T))` from Jähne et al. (1987). Argon was
//! not measured there; its constants are interpolated from Ne and Kr.

use crate::domain::GasType;

const GAS_CONSTANT: f64 = 8.314_462_618;
const KELVIN_OFFSET: f64 = 273.15;

/// `(A in cm²/s, Ea in J/mol)` for a gas.
fn arrhenius(gas: GasType) -> (f64, f64) {
    match gas.diffusion_species() {
        GasType::He | GasType::He3 => (818e-5, 11_700.0),
        GasType::Ne => (1608e-5, 14_840.0),
        GasType::Ar => (2233e-5, 16_680.0),
        GasType::Kr => (6393e-5, 20_200.0),
        GasType::Xe => (9007e-5, 21_610.0),
    }
}

/// Diffusivity of a gas in water at a given temperature.
#[derive(Debug, Clone, Copy)]
pub struct WaterDiffusivity {
    t_kelvin: f64,
    prefactor: f64,
    activation: f64,
}

impl WaterDiffusivity {
    pub fn new(t_celsius: f64, gas: GasType) -> Self {
        let (prefactor, activation) = arrhenius(gas);
        Self {
            t_kelvin: t_celsius + KELVIN_OFFSET,
            prefactor,
            activation,
        }
    }

    /// D in cm²/s.
    pub fn evaluate(&self) -> f64 {
        self.prefactor * (-self.activation / (GAS_CONSTANT * self.t_kelvin)).exp()
    }

    pub fn derive_by_t(&self) -> f64 {
        self.evaluate() * self.activation / (GAS_CONSTANT * self.t_kelvin * self.t_kelvin)
    }
}

/// `D_gas / D_Ne` in water and its temperature derivative.
///
/// Returns `(ratio, d ratio / dT)`.
pub fn ratio_to_neon(t_celsius: f64, gas: GasType) -> (f64, f64) {
    let d_gas = WaterDiffusivity::new(t_celsius, gas);
    let d_ne = WaterDiffusivity::new(t_celsius, GasType::Ne);
    let (g, n) = (d_gas.evaluate(), d_ne.evaluate());
    (g / n, (d_gas.derive_by_t() * n - g * d_ne.derive_by_t()) / (n * n))
}
