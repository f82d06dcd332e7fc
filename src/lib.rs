//! `noblefit` library crate.
//!
//! Excess-air models and solubility-equilibrium methods for dissolved noble
//! gases, with analytic derivatives, and a fitting driver on top.
//!
//! The binary (`noblefit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - models and methods are reusable from other drivers

pub mod app;
pub mod ceq;
pub mod cli;
pub mod concentration;
pub mod data;
pub mod derivative;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod params;
pub mod registry;
pub mod report;
