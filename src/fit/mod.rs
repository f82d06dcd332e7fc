//! Fitting orchestration.
//!
//! Responsibilities:
//!
//! - describe a fit: model combination, free parameters, gases (`problem`)
//! - Levenberg–Marquardt per sample, parallel across samples (`fitter`)
//! - Monte Carlo error estimates (`monte_carlo`)

pub mod fitter;
pub mod monte_carlo;
pub mod problem;

pub use fitter::*;
pub use monte_carlo::*;
pub use problem::*;
