//! Measured samples and the enabled/disabled view used by fitting.

pub mod run_data;

pub use run_data::*;
