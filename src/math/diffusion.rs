//! Gas diffusion coefficients in air (Chapman–Enskog).
//!
//! The binary diffusion coefficient of a noble gas through air is
//!
//! ```text
//! D(T, p) = y · T^1.5 / (p · Ω_D(T*)),   T* = T / ε_AB
//! ```
//!
//! with `T` in K, `D` in cm²/s and the collision integral `Ω_D` given by the
//! Neufeld et al. (1972) four-term fit. Lennard-Jones parameters are the
//! tabulated values from Poling, Prausnitz & O'Connell (2001).

use std::sync::LazyLock;

use crate::domain::{ATM_IN_BAR, GasType};

/// Neufeld collision-integral coefficients `a..h`.
const NEUFELD: [f64; 8] = [1.06036, 0.15610, 0.19300, 0.47635, 1.03587, 1.52996, 1.76474, 3.89411];

/// Chapman–Enskog prefactor for D in cm²/s with M in g/mol, σ in Å, p in bar.
const CHAPMAN_ENSKOG: f64 = 0.00266;

const KELVIN_OFFSET: f64 = 273.15;

/// Lennard-Jones parameters and molar mass of a single species.
#[derive(Debug, Clone, Copy)]
struct Species {
    /// ε/κ in K.
    epsilon: f64,
    /// Collision diameter in Å.
    sigma: f64,
    /// Molar mass in g/mol.
    mass: f64,
}

const AIR: Species = Species {
    epsilon: 78.6,
    sigma: 3.711,
    mass: 28.9647,
};

fn species(gas: GasType) -> Species {
    match gas.diffusion_species() {
        GasType::He | GasType::He3 => Species {
            epsilon: 10.22,
            sigma: 2.551,
            mass: 4.0026,
        },
        GasType::Ne => Species {
            epsilon: 32.8,
            sigma: 2.820,
            mass: 20.1797,
        },
        GasType::Ar => Species {
            epsilon: 93.3,
            sigma: 3.542,
            mass: 39.948,
        },
        GasType::Kr => Species {
            epsilon: 178.9,
            sigma: 3.655,
            mass: 83.798,
        },
        GasType::Xe => Species {
            epsilon: 231.0,
            sigma: 4.047,
            mass: 131.293,
        },
    }
}

/// Gas–air pair constants derived from the species tables.
#[derive(Debug, Clone, Copy)]
struct PairConstants {
    epsilon: f64,
    y: f64,
}

impl PairConstants {
    fn derive(gas: Species) -> Self {
        // ε_AB from ε_A, ε_B; y from the combined mass and diameter.
        let epsilon = (gas.epsilon * AIR.epsilon).sqrt();
        let sigma = 0.5 * (gas.sigma + AIR.sigma);
        let mass = 2.0 / (1.0 / gas.mass + 1.0 / AIR.mass);
        let y = CHAPMAN_ENSKOG / (mass.sqrt() * sigma * sigma);
        Self { epsilon, y }
    }
}

static PAIRS: LazyLock<[PairConstants; 5]> = LazyLock::new(|| {
    GasType::STANDARD.map(|gas| PairConstants::derive(species(gas)))
});

fn pair(gas: GasType) -> PairConstants {
    let idx = match gas.diffusion_species() {
        GasType::He | GasType::He3 => 0,
        GasType::Ne => 1,
        GasType::Ar => 2,
        GasType::Kr => 3,
        GasType::Xe => 4,
    };
    PAIRS[idx]
}

/// Collision integral `Ω_D(T*)`.
fn collision_integral(t_star: f64) -> f64 {
    let [a, b, c, d, e, f, g, h] = NEUFELD;
    a / t_star.powf(b) + c / (d * t_star).exp() + e / (f * t_star).exp() + g / (h * t_star).exp()
}

/// `dΩ_D/dT*`.
fn collision_integral_derivative(t_star: f64) -> f64 {
    let [a, b, c, d, e, f, g, h] = NEUFELD;
    -a * b / t_star.powf(b + 1.0) - c * d / (d * t_star).exp() - e * f / (f * t_star).exp() - g * h / (h * t_star).exp()
}

/// Diffusion coefficient of one gas in air at fixed temperature and pressure.
#[derive(Debug, Clone, Copy)]
pub struct GasDiffusionModel {
    t_kelvin: f64,
    pressure: f64,
    pair: PairConstants,
}

impl GasDiffusionModel {
    /// `t_celsius` in °C and `p_atm` in atm.
    pub fn new(t_celsius: f64, p_atm: f64, gas: GasType) -> Self {
        Self {
            t_kelvin: t_celsius + KELVIN_OFFSET,
            pressure: p_atm / ATM_IN_BAR,
            pair: pair(gas),
        }
    }

    /// D in cm²/s.
    pub fn evaluate(&self) -> f64 {
        let t_star = self.t_kelvin / self.pair.epsilon;
        self.pair.y * self.t_kelvin.powf(1.5) / self.pressure / collision_integral(t_star)
    }

    /// ∂D/∂p with respect to the normalized pressure.
    pub fn derive_by_p(&self) -> f64 {
        -self.evaluate() / self.pressure
    }

    /// ∂D/∂T (per K, identical per °C).
    pub fn derive_by_t(&self) -> f64 {
        let t_star = self.t_kelvin / self.pair.epsilon;
        let omega = collision_integral(t_star);
        let d_omega = collision_integral_derivative(t_star) / self.pair.epsilon;
        let numer = 1.5 * self.t_kelvin.sqrt() * omega - self.t_kelvin.powf(1.5) * d_omega;
        self.pair.y / self.pressure * numer / (omega * omega)
    }

    /// ∂D/∂p with respect to the pressure in atm passed to [`GasDiffusionModel::new`].
    pub fn derive_by_p_atm(&self) -> f64 {
        self.derive_by_p() / ATM_IN_BAR
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn derive_by_p_is_minus_d_over_p() {
        for gas in GasType::STANDARD {
            for &t in &[0.0, 5.0, 10.0, 25.0, 40.0] {
                for &p in &[0.5, 0.8, 1.0, 1.2] {
                    let model = GasDiffusionModel::new(t, p, gas);
                    assert_eq!(model.derive_by_p(), -model.evaluate() / model.pressure);
                }
            }
        }
    }

    #[test]
    fn derive_by_t_matches_central_difference() {
        let h = 1e-4;
        for gas in GasType::STANDARD {
            for &t in &[2.0, 15.0, 30.0] {
                let analytic = GasDiffusionModel::new(t, 1.0, gas).derive_by_t();
                let numeric = (GasDiffusionModel::new(t + h, 1.0, gas).evaluate()
                    - GasDiffusionModel::new(t - h, 1.0, gas).evaluate())
                    / (2.0 * h);
                assert_relative_eq!(analytic, numeric, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn derive_by_p_atm_matches_central_difference() {
        let h = 1e-6;
        let analytic = GasDiffusionModel::new(10.0, 0.9, GasType::Ar).derive_by_p_atm();
        let numeric = (GasDiffusionModel::new(10.0, 0.9 + h, GasType::Ar).evaluate()
            - GasDiffusionModel::new(10.0, 0.9 - h, GasType::Ar).evaluate())
            / (2.0 * h);
        assert_relative_eq!(analytic, numeric, max_relative = 1e-6);
    }

    #[test]
    fn lighter_gases_diffuse_faster() {
        let d: Vec<f64> = GasType::STANDARD
            .iter()
            .map(|&gas| GasDiffusionModel::new(10.0, 1.0, gas).evaluate())
            .collect();
        assert!(d.windows(2).all(|w| w[0] > w[1]), "{d:?}");
        // He in air is roughly 0.7 cm²/s near room temperature.
        assert!(d[0] > 0.4 && d[0] < 1.0, "{}", d[0]);
    }

    #[test]
    fn helium_isotopes_share_coefficients() {
        let he = GasDiffusionModel::new(12.0, 1.0, GasType::He);
        let he3 = GasDiffusionModel::new(12.0, 1.0, GasType::He3);
        assert_eq!(he.evaluate(), he3.evaluate());
    }
}
