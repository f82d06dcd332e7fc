//! Mathematical utilities: diffusion coefficients and least squares.

pub mod diffusion;
pub mod ols;
pub mod water_diffusion;

pub use diffusion::GasDiffusionModel;
pub use ols::*;
pub use water_diffusion::{WaterDiffusivity, ratio_to_neon};
