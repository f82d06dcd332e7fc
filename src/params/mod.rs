//! Named, bounded physical parameters shared by the models.
//!
//! Each model or method registers an ordered list of [`ParameterDescriptor`]s
//! into a [`ParameterSet`] when it is created. The set assigns global indices;
//! current values live in a plain `Vec<f64>` owned by the caller and are read
//! through [`ParameterValues`].

pub mod descriptor;
pub mod set;

pub use descriptor::*;
pub use set::*;
