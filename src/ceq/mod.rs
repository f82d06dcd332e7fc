//! Solubility-equilibrium concentration methods.
//!
//! Each method computes `c_eq(T, S, p)` for every gas and its analytic partial
//! derivatives. Methods register the shared `T`, `S`, `p` parameters.

pub mod jenkins;
pub mod method;
pub mod solubility;
pub mod weiss;

pub use jenkins::Jenkins;
pub use method::{CEqMethod, MethodParameters, param};
pub use solubility::{Equilibrium, SolubilityFit};
pub use weiss::Weiss;
