//! Name → constructor lookup for excess-air models and equilibrium methods.
//!
//! Registries are plain values: build one with [`Registry::with_builtin`]
//! (or empty, for tests) and pass it to whoever needs to create models.

use std::collections::{BTreeMap, BTreeSet};

use crate::ceq::{self, CEqMethod};
use crate::error::{NobleError, Result};
use crate::models::{self, ExcessAirModel};
use crate::params::ParameterSet;

/// Creates an instance bound to (and registering into) a parameter set.
pub type Factory<T> = fn(&mut ParameterSet) -> Box<T>;

pub type ModelFactory = Factory<dyn ExcessAirModel>;
pub type MethodFactory = Factory<dyn CEqMethod>;

/// Which family a registry serves, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Model,
    Method,
}

#[derive(Debug)]
pub struct Registry<T: ?Sized> {
    family: Family,
    factories: BTreeMap<&'static str, Factory<T>>,
}

pub type ModelRegistry = Registry<dyn ExcessAirModel>;
pub type MethodRegistry = Registry<dyn CEqMethod>;

impl<T: ?Sized> Registry<T> {
    fn empty(family: Family) -> Self {
        Self {
            family,
            factories: BTreeMap::new(),
        }
    }

    /// Add or replace a factory.
    pub fn register(&mut self, name: &'static str, factory: Factory<T>) {
        self.factories.insert(name, factory);
    }

    pub fn get_factory(&self, name: &str) -> Result<Factory<T>> {
        self.factories.get(name).copied().ok_or_else(|| match self.family {
            Family::Model => NobleError::UnknownModel(name.to_string()),
            Family::Method => NobleError::UnknownMethod(name.to_string()),
        })
    }

    /// Look up `name` and construct an instance against `set`.
    pub fn create(&self, name: &str, set: &mut ParameterSet) -> Result<Box<T>> {
        Ok(self.get_factory(name)?(set))
    }

    pub fn names(&self) -> BTreeSet<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::empty(Family::Model)
    }

    /// Registry with every model shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(models::ua::NAME, |set| Box::new(models::UnfractionatedAir::new(set)));
        registry.register(models::pr::NAME, |set| Box::new(models::PartialReequilibration::new(set)));
        registry.register(models::pd::NAME, |set| Box::new(models::PartialDegassing::new(set)));
        registry.register(models::ce::NAME, |set| Box::new(models::ClosedEquilibration::new(set)));
        registry.register(models::od::NAME, |set| Box::new(models::OxygenDepletion::new(set)));
        registry.register(models::gr::NAME, |set| Box::new(models::GasDiffusionRelaxation::new(set)));
        registry
    }
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::empty(Family::Method)
    }

    /// Registry with every equilibrium method shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ceq::weiss::NAME, |set| Box::new(ceq::Weiss::new(set)));
        registry.register(ceq::jenkins::NAME, |set| Box::new(ceq::Jenkins::new(set)));
        registry
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
