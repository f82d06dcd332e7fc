use serde::Serialize;

use super::ParameterDescriptor;
use crate::error::{NobleError, Result};

/// Ordered registry of the parameters of one model/method combination.
///
/// Registration order defines the global parameter index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParameterSet {
    descriptors: Vec<ParameterDescriptor>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor and return its global index.
    ///
    /// A name that is already registered is shared: the existing index is
    /// returned and the first descriptor stays in effect.
    pub fn register(&mut self, descriptor: ParameterDescriptor) -> usize {
        if let Some(idx) = self.position(&descriptor.name) {
            return idx;
        }
        self.descriptors.push(descriptor);
        self.descriptors.len() - 1
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, index: usize) -> Result<&ParameterDescriptor> {
        self.descriptors.get(index).ok_or(NobleError::OutOfRange {
            what: "parameters",
            index,
            len: self.descriptors.len(),
        })
    }

    /// Global index of a parameter by name.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| NobleError::UnknownParameter(name.to_string()))
    }

    /// Vector of default values in global index order.
    pub fn defaults(&self) -> Vec<f64> {
        self.descriptors.iter().map(|d| d.default_value).collect()
    }

    /// Resolve a list of names to global indices, preserving order.
    pub fn indices_of<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<Vec<usize>> {
        names.into_iter().map(|name| self.index_of(name)).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }
}

/// Read-only view over the current values of every registered parameter.
///
/// Lives for a single evaluation; models read their own entries by the global
/// indices they received at registration.
#[derive(Debug, Clone, Copy)]
pub struct ParameterValues<'a> {
    values: &'a [f64],
}

impl<'a> ParameterValues<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self { values }
    }

    /// Value at a global index.
    ///
    /// # Panics
    /// Panics if `index` is out of range. Models only use indices handed out by
    /// the parameter set the values vector was built from.
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }
}
