//! Weiss solubility method.
//!
//! He and Ne from Weiss (1971), Ar from Weiss (1970), Kr from Weiss & Kyser
//! (1978), all in cm³STP/kg for moist air. Weiss published no Xe constants;
//! Xe uses the Jenkins et al. (2019) temperature/salinity fit without its
//! quadratic salinity term.

use super::method::{CEqMethod, MethodParameters, evaluate_table};
use super::solubility::{Equilibrium, SolubilityFit};
use crate::domain::{GasType, MOLAR_VOLUME_STP};
use crate::params::{ParameterSet, ParameterValues};

pub const NAME: &str = "Weiss";

/// cm³STP/kg to cm³STP/g.
const PER_KG: f64 = 1e-3;

pub(crate) const KRYPTON: SolubilityFit = SolubilityFit {
    a: [-112.6840, 153.5817, 74.4690, -10.0189],
    b: [-0.011213, -0.001844, 0.0011201],
    c1: 0.0,
    scale: PER_KG,
};

fn table(gas: GasType) -> SolubilityFit {
    match gas {
        GasType::He | GasType::He3 => SolubilityFit {
            a: [-167.2178, 216.3442, 139.2032, -22.6202],
            b: [-0.044781, 0.023541, -0.0034266],
            c1: 0.0,
            scale: PER_KG,
        },
        GasType::Ne => SolubilityFit {
            a: [-170.6018, 225.1946, 140.8863, -22.6290],
            b: [-0.127113, 0.079277, -0.0129095],
            c1: 0.0,
            scale: PER_KG,
        },
        GasType::Ar => SolubilityFit {
            a: [-173.5146, 245.4510, 141.8222, -21.8020],
            b: [-0.034474, 0.014934, -0.0017729],
            c1: 0.0,
            scale: PER_KG,
        },
        GasType::Kr => KRYPTON,
        GasType::Xe => SolubilityFit {
            a: [-224.51, 292.8234, 157.6127, -22.66895],
            b: [-0.084915, 0.047996, -0.0073595],
            c1: 0.0,
            scale: MOLAR_VOLUME_STP * PER_KG,
        },
    }
}

#[derive(Debug, Clone)]
pub struct Weiss {
    params: MethodParameters,
}

impl Weiss {
    pub fn new(set: &mut ParameterSet) -> Self {
        Self {
            params: MethodParameters::register(set),
        }
    }
}

impl CEqMethod for Weiss {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_indices(&self) -> &[usize] {
        self.params.indices()
    }

    fn evaluate(&self, x: &ParameterValues<'_>, gas: GasType) -> Equilibrium {
        evaluate_table(table, &self.params, x, gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_water_values_at_ten_degrees() {
        let mut set = ParameterSet::new();
        let method = Weiss::new(&mut set);
        let values = set.defaults();
        let x = ParameterValues::new(&values);

        // Typical values in cm³STP/g at 10 °C, S = 0, 1 atm.
        let expected = [
            (GasType::He, 4.6e-8),
            (GasType::Ne, 2.0e-7),
            (GasType::Ar, 3.9e-4),
            (GasType::Kr, 9.0e-8),
            (GasType::Xe, 1.3e-8),
        ];
        for (gas, reference) in expected {
            let c = method.equilibrium(&x, gas);
            assert!((c / reference - 1.0).abs() < 0.1, "{gas}: {c} vs {reference}");
        }
    }

    #[test]
    fn helium3_follows_helium() {
        let mut set = ParameterSet::new();
        let method = Weiss::new(&mut set);
        let values = set.defaults();
        let x = ParameterValues::new(&values);
        let ratio = method.equilibrium(&x, GasType::He3) / method.equilibrium(&x, GasType::He);
        assert!((ratio / 1.36e-6 - 1.0).abs() < 0.01, "{ratio}");
    }
}
