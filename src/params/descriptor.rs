use serde::{Deserialize, Serialize};

/// Static description of one physical parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub unit: String,
    pub default_value: f64,
    /// May be `f64::NEG_INFINITY`.
    pub lower_bound: f64,
    /// May be `f64::INFINITY`.
    pub upper_bound: f64,
    /// Suggested increment for interactive adjustment.
    pub step: f64,
}

impl ParameterDescriptor {
    pub fn new(name: &str, unit: &str, default_value: f64, lower_bound: f64, upper_bound: f64, step: f64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            default_value,
            lower_bound,
            upper_bound,
            step,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }

    /// Clamp into `[lower_bound, upper_bound]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower_bound).min(self.upper_bound)
    }
}

/// Standard descriptors shared between models and methods.
///
/// Registering the same name twice yields one shared parameter, so every
/// model that depends on the recharge temperature uses this exact descriptor.
pub mod standard {
    use super::ParameterDescriptor;

    pub fn temperature() -> ParameterDescriptor {
        ParameterDescriptor::new("T", "°C", 10.0, 0.0, 50.0, 0.1)
    }

    pub fn salinity() -> ParameterDescriptor {
        ParameterDescriptor::new("S", "‰", 0.0, 0.0, 50.0, 0.1)
    }

    pub fn pressure() -> ParameterDescriptor {
        ParameterDescriptor::new("p", "atm", 1.0, 0.0, 10.0, 0.01)
    }

    pub fn excess_air() -> ParameterDescriptor {
        ParameterDescriptor::new("A", "cm³STP/g", 0.001, 0.0, 1.0, 1e-4)
    }

    pub fn oxygen_depletion() -> ParameterDescriptor {
        ParameterDescriptor::new("P_OD", "", 1.0, 0.0, 10.0, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_infinite_bounds() {
        let d = ParameterDescriptor::new("F", "", 0.5, 0.0, f64::INFINITY, 0.01);
        assert_eq!(d.clamp(-1.0), 0.0);
        assert_eq!(d.clamp(1e12), 1e12);
        assert!(d.contains(0.0));
        assert!(!d.contains(-1e-9));
    }
}
