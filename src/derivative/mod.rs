//! Mapping from model parameters to Jacobian row slots.
//!
//! Models know *which* parameter a derivative belongs to; the fitting driver
//! only knows vector positions. A [`DerivativeCollector`] bridges the two:
//! it is configured with the window of the driver-owned row buffer it writes
//! into and the list of active (free) global parameter indices, and exposes
//! the resulting `(parameter, slot)` pairs.
//!
//! Several collectors may be configured with the same window. The equilibrium
//! method and the excess-air model do exactly that to build one combined row.

pub mod collector;

pub use collector::*;
