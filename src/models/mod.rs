//! Excess-air model implementations.
//!
//! One model per physical theory of how entrapped air adds to the
//! equilibrium concentration:
//!
//! - `UA`: unfractionated air
//! - `PR`: partial re-equilibration
//! - `PD`: partial degassing
//! - `CE`: closed-system equilibration
//! - `OD`: unfractionated air with oxygen depletion
//! - `GR`: gas diffusion relaxation
//!
//! Models are stateless apart from the parameter indices they registered, so
//! fitting code can call them from any thread.

pub mod ce;
pub mod gr;
pub mod model;
pub mod od;
pub mod pd;
pub mod pr;
pub mod ua;

pub use ce::ClosedEquilibration;
pub use gr::GasDiffusionRelaxation;
pub use model::*;
pub use od::OxygenDepletion;
pub use pd::PartialDegassing;
pub use pr::PartialReequilibration;
pub use ua::UnfractionatedAir;
