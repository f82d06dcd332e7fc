use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::{Data, GasType, SampleConcentrations};
use crate::error::{NobleError, Result};

/// One measured water sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub name: String,
    pub concentrations: SampleConcentrations,
    pub enabled: bool,
}

impl Sample {
    pub fn new(name: impl Into<String>, concentrations: SampleConcentrations) -> Self {
        Self {
            name: name.into(),
            concentrations,
            enabled: true,
        }
    }

    pub fn with_gas(mut self, gas: GasType, value: f64, error: f64) -> Self {
        self.concentrations.insert(gas, Data::new(value, error));
        self
    }

    pub fn measured(&self, gas: GasType) -> Option<Data> {
        self.concentrations.get(&gas).copied()
    }
}

/// What changed in a [`RunData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDataChange {
    Enabled(usize),
    Disabled(usize),
    GasRemoved(GasType),
    Replaced,
}

/// Position of a sample among the enabled samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnabledLookup {
    /// The sample is the `k`-th enabled sample.
    Found(usize),
    /// The sample exists but is disabled.
    Disabled,
    OutOfRange,
}

pub type Listener = Box<dyn FnMut(&RunDataChange) + Send>;

/// Ordered sample collection. Insertion order defines the sample index space.
///
/// Names are not checked for uniqueness here; loaders reject duplicates.
#[derive(Default)]
pub struct RunData {
    samples: Vec<Sample>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for RunData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunData")
            .field("samples", &self.samples)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RunData {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            listeners: Vec::new(),
        }
    }

    /// Call `listener` after every effective change.
    pub fn subscribe(&mut self, listener: impl FnMut(&RunDataChange) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Swap in a freshly loaded sample list. Listeners are kept.
    pub fn replace(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
        self.notify(RunDataChange::Replaced);
    }

    pub fn total_size(&self) -> usize {
        self.samples.len()
    }

    pub fn enabled_size(&self) -> usize {
        self.samples.iter().filter(|s| s.enabled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, index: usize) -> Result<&Sample> {
        self.samples.get(index).ok_or(NobleError::OutOfRange {
            what: "samples",
            index,
            len: self.samples.len(),
        })
    }

    pub fn enable(&mut self, index: usize) -> Result<bool> {
        self.set_enabled(index, true)
    }

    pub fn disable(&mut self, index: usize) -> Result<bool> {
        self.set_enabled(index, false)
    }

    /// Set the flag of one sample. Returns whether anything changed; a sample
    /// already in the target state fires no notification.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<bool> {
        let len = self.samples.len();
        let sample = self.samples.get_mut(index).ok_or(NobleError::OutOfRange {
            what: "samples",
            index,
            len,
        })?;
        if sample.enabled == enabled {
            return Ok(false);
        }
        sample.enabled = enabled;
        self.notify(if enabled {
            RunDataChange::Enabled(index)
        } else {
            RunDataChange::Disabled(index)
        });
        Ok(true)
    }

    /// Enabled samples in insertion order. The iterator is lazy and can be
    /// cloned to restart from the same position.
    pub fn enabled_samples(&self) -> impl Iterator<Item = &Sample> + Clone {
        self.samples.iter().filter(|s| s.enabled)
    }

    /// Concentrations of the enabled samples in insertion order.
    pub fn enabled_concentrations(&self) -> impl Iterator<Item = &SampleConcentrations> + Clone {
        self.enabled_samples().map(|s| &s.concentrations)
    }

    /// Translate a total index into a position among enabled samples.
    pub fn enabled_lookup(&self, index: usize) -> EnabledLookup {
        match self.samples.get(index) {
            None => EnabledLookup::OutOfRange,
            Some(sample) if !sample.enabled => EnabledLookup::Disabled,
            Some(_) => EnabledLookup::Found(self.samples[..index].iter().filter(|s| s.enabled).count()),
        }
    }

    /// Erase one gas from every sample. Returns how many samples held it.
    pub fn remove_gas(&mut self, gas: GasType) -> usize {
        let removed = self
            .samples
            .iter_mut()
            .filter_map(|s| s.concentrations.remove(&gas))
            .count();
        if removed > 0 {
            self.notify(RunDataChange::GasRemoved(gas));
        }
        removed
    }

    /// Gases measured in at least one sample.
    pub fn gases(&self) -> BTreeSet<GasType> {
        self.samples
            .iter()
            .flat_map(|s| s.concentrations.keys().copied())
            .collect()
    }

    fn notify(&mut self, change: RunDataChange) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;

    use super::*;

    fn run() -> RunData {
        RunData::new(vec![
            Sample::new("S1", SampleConcentrations::new())
                .with_gas(GasType::He, 4.5e-8, 1e-9)
                .with_gas(GasType::Ne, 2.0e-7, 5e-9),
            Sample::new("S2", SampleConcentrations::new()).with_gas(GasType::Ne, 1.9e-7, 5e-9),
            Sample::new("S3", SampleConcentrations::new()).with_gas(GasType::Ar, 3.8e-4, 4e-6),
            Sample::new("S4", SampleConcentrations::new()),
        ])
    }

    fn recorded(data: &mut RunData) -> Arc<Mutex<Vec<RunDataChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        data.subscribe(move |change| sink.lock().unwrap().push(*change));
        log
    }

    #[test]
    fn toggling_into_current_state_is_silent() {
        let mut data = run();
        let log = recorded(&mut data);

        assert!(!data.enable(0).unwrap());
        assert!(data.disable(1).unwrap());
        assert!(!data.disable(1).unwrap());
        assert!(data.enable(1).unwrap());

        assert_eq!(
            *log.lock().unwrap(),
            vec![RunDataChange::Disabled(1), RunDataChange::Enabled(1)]
        );
    }

    proptest! {
        #[test]
        fn enabled_view_tracks_any_toggle_sequence(
            ops in prop::collection::vec((0usize..4, any::<bool>()), 0..40),
        ) {
            let mut data = run();
            let log = recorded(&mut data);

            for (index, enabled) in ops {
                let before = data.samples()[index].enabled;
                let notified = log.lock().unwrap().len();

                let changed = data.set_enabled(index, enabled).unwrap();
                prop_assert_eq!(changed, before != enabled);

                let events = log.lock().unwrap();
                if changed {
                    let expected = if enabled {
                        RunDataChange::Enabled(index)
                    } else {
                        RunDataChange::Disabled(index)
                    };
                    prop_assert_eq!(events.len(), notified + 1);
                    prop_assert_eq!(events[notified], expected);
                } else {
                    prop_assert_eq!(events.len(), notified);
                }
                drop(events);

                prop_assert!(data.enabled_size() <= data.total_size());
                let expected: Vec<&str> = data
                    .samples()
                    .iter()
                    .filter(|s| s.enabled)
                    .map(|s| s.name.as_str())
                    .collect();
                let seen: Vec<&str> = data.enabled_samples().map(|s| s.name.as_str()).collect();
                prop_assert_eq!(seen.len(), data.enabled_size());
                prop_assert_eq!(seen, expected);
            }
        }
    }

    #[test]
    fn enabled_iterator_is_restartable() {
        let mut data = run();
        data.disable(1).unwrap();
        let iter = data.enabled_concentrations();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first[0].contains_key(&GasType::He));
        assert!(first[1].contains_key(&GasType::Ar));
    }

    #[test]
    fn lookup_distinguishes_disabled_and_out_of_range() {
        let mut data = run();
        data.disable(1).unwrap();
        assert_eq!(data.enabled_lookup(0), EnabledLookup::Found(0));
        assert_eq!(data.enabled_lookup(1), EnabledLookup::Disabled);
        assert_eq!(data.enabled_lookup(2), EnabledLookup::Found(1));
        assert_eq!(data.enabled_lookup(4), EnabledLookup::OutOfRange);
        assert!(matches!(data.enable(9), Err(NobleError::OutOfRange { index: 9, len: 4, .. })));
    }

    #[test]
    fn removing_a_gas_clears_every_sample() {
        let mut data = run();
        let log = recorded(&mut data);

        assert_eq!(data.remove_gas(GasType::Ne), 2);
        assert_eq!(data.remove_gas(GasType::Ne), 0);
        assert!(!data.gases().contains(&GasType::Ne));
        assert_eq!(data.gases(), BTreeSet::from([GasType::He, GasType::Ar]));
        assert_eq!(*log.lock().unwrap(), vec![RunDataChange::GasRemoved(GasType::Ne)]);
    }

    #[test]
    fn replace_notifies_and_resets_samples() {
        let mut data = run();
        let log = recorded(&mut data);
        data.replace(vec![Sample::new("only", SampleConcentrations::new())]);
        assert_eq!(data.total_size(), 1);
        assert_eq!(*log.lock().unwrap(), vec![RunDataChange::Replaced]);
    }
}
