//! Common temperature/salinity solubility fit and its moist-air pressure correction.
//!
//! Both the Weiss and the Jenkins constants share one functional form
//! (T in K, τ = T/100, S in ‰):
//!
//! ```text
//! ln C* = A1 + A2/τ + A3 ln τ + A4 τ + S (B1 + B2 τ + B3 τ²) + C1 S²
//! ```
//!
//! `C*` is the equilibrium concentration with moist air at 1 atm total
//! pressure. At total pressure `p` the dry-gas partial pressure scales with
//! `(p − e_w)/(1 − e_w)` where `e_w` is the saturation water-vapour pressure
//! (Weiss & Price, 1980):
//!
//! ```text
//! ln e_w = 24.4543 − 67.4509/τ − 4.8489 ln τ − 0.000544 S      (atm)
//! ```

const KELVIN_OFFSET: f64 = 273.15;

/// Constants of one gas in the common fit, plus the factor converting the
/// fit's native unit to cm³STP/g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolubilityFit {
    pub a: [f64; 4],
    pub b: [f64; 3],
    pub c1: f64,
    pub scale: f64,
}

/// Concentration and its partial derivatives by T (°C or K), S, and p (atm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    pub value: f64,
    pub d_t: f64,
    pub d_s: f64,
    pub d_p: f64,
}

impl Equilibrium {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            d_t: self.d_t * factor,
            d_s: self.d_s * factor,
            d_p: self.d_p * factor,
        }
    }
}

/// Water vapour pressure in atm and its derivatives by T and S.
fn vapour_pressure(tau: f64, s: f64) -> (f64, f64, f64) {
    let e = (24.4543 - 67.4509 / tau - 4.8489 * tau.ln() - 0.000544 * s).exp();
    let d_t = e * (67.4509 / (tau * tau) - 4.8489 / tau) / 100.0;
    let d_s = -0.000544 * e;
    (e, d_t, d_s)
}

impl SolubilityFit {
    /// `ln C*` and its derivatives by T and S.
    fn log_concentration(&self, tau: f64, s: f64) -> (f64, f64, f64) {
        let [a1, a2, a3, a4] = self.a;
        let [b1, b2, b3] = self.b;
        let ln_c = a1 + a2 / tau + a3 * tau.ln() + a4 * tau + s * (b1 + b2 * tau + b3 * tau * tau) + self.c1 * s * s;
        let d_t = (-a2 / (tau * tau) + a3 / tau + a4 + s * (b2 + 2.0 * b3 * tau)) / 100.0;
        let d_s = b1 + b2 * tau + b3 * tau * tau + 2.0 * self.c1 * s;
        (ln_c, d_t, d_s)
    }

    /// Equilibrium concentration in cm³STP/g at `t_celsius`, salinity `s`, pressure `p_atm`.
    pub fn evaluate(&self, t_celsius: f64, s: f64, p_atm: f64) -> Equilibrium {
        let tau = (t_celsius + KELVIN_OFFSET) / 100.0;
        let (ln_c, dln_t, dln_s) = self.log_concentration(tau, s);
        let (e, de_t, de_s) = vapour_pressure(tau, s);

        let base = self.scale * ln_c.exp();
        let g = (p_atm - e) / (1.0 - e);
        let dg_de = (p_atm - 1.0) / ((1.0 - e) * (1.0 - e));
        let dg_dp = 1.0 / (1.0 - e);

        let value = base * g;
        Equilibrium {
            value,
            d_t: value * dln_t + base * dg_de * de_t,
            d_s: value * dln_s + base * dg_de * de_s,
            d_p: base * dg_dp,
        }
    }
}
