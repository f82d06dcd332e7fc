//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the gas species enumeration (`GasType`) and measured values (`Data`)
//! - compiled-in atmospheric properties (`properties`)
//! - resolved run configuration (`config`)

pub mod config;
pub mod gas;
pub mod properties;

pub use config::*;
pub use gas::*;
pub use properties::*;
