//! Jenkins solubility method.
//!
//! Constants from Jenkins, Lott & Cahill (2019) in mol/kg for moist air,
//! including the quadratic salinity term. Kr falls back to Weiss & Kyser
//! (1978).

use super::method::{CEqMethod, MethodParameters, evaluate_table};
use super::solubility::{Equilibrium, SolubilityFit};
use super::weiss;
use crate::domain::{GasType, MOLAR_VOLUME_STP};
use crate::params::{ParameterSet, ParameterValues};

pub const NAME: &str = "Jenkins";

/// mol/kg to cm³STP/g.
const MOL_PER_KG: f64 = MOLAR_VOLUME_STP * 1e-3;

fn table(gas: GasType) -> SolubilityFit {
    match gas {
        GasType::He | GasType::He3 => SolubilityFit {
            a: [-178.1424, 217.5991, 140.7506, -23.01954],
            b: [-0.038129, 0.01919, -0.0026898],
            c1: -2.55157e-6,
            scale: MOL_PER_KG,
        },
        GasType::Ne => SolubilityFit {
            a: [-274.1329, 352.6201, 226.9676, -37.13393],
            b: [-0.06386, 0.035326, -0.0053258],
            c1: 1.28233e-5,
            scale: MOL_PER_KG,
        },
        GasType::Ar => SolubilityFit {
            a: [-227.4607, 305.4347, 180.5278, -27.9945],
            b: [-0.066942, 0.037201, -0.0056364],
            c1: -5.30325e-6,
            scale: MOL_PER_KG,
        },
        GasType::Kr => weiss::KRYPTON,
        GasType::Xe => SolubilityFit {
            a: [-224.51, 292.8234, 157.6127, -22.66895],
            b: [-0.084915, 0.047996, -0.0073595],
            c1: 6.69293e-6,
            scale: MOL_PER_KG,
        },
    }
}

#[derive(Debug, Clone)]
pub struct Jenkins {
    params: MethodParameters,
}

impl Jenkins {
    pub fn new(set: &mut ParameterSet) -> Self {
        Self {
            params: MethodParameters::register(set),
        }
    }
}

impl CEqMethod for Jenkins {
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
