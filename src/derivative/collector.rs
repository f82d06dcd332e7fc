use crate::error::{NobleError, Result};
use crate::params::ParameterSet;

/// Which parameter a tracked slot belongs to, from the model's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeTarget {
    /// One of the model's own parameters, by local (registration) index.
    Parameter(usize),
    /// An active parameter the model does not own.
    Other,
}

/// Whether active parameters not owned by the model get a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherParameters {
    Track,
    Ignore,
}

/// A window `[offset, offset + len)` into a row buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub offset: usize,
    pub len: usize,
}

impl SlotRange {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// The whole buffer of length `len`.
    pub fn whole(len: usize) -> Self {
        Self { offset: 0, len }
    }
}

#[derive(Debug, Clone)]
pub struct DerivativeCollector {
    /// `bindings[local] = global index`.
    bindings: Vec<usize>,
    other: OtherParameters,
    information: Vec<(DerivativeTarget, usize)>,
    configured: bool,
}

impl DerivativeCollector {
    pub fn new(bindings: Vec<usize>, other: OtherParameters) -> Self {
        Self {
            bindings,
            other,
            information: Vec::new(),
            configured: false,
        }
    }

    /// Point the collector at `output` for the given active parameters.
    ///
    /// Position `i` of `active_indices` maps to slot `output.offset + i`.
    /// Replaces any previous mapping.
    pub fn set_derivatives_and_results_vector(&mut self, output: SlotRange, active_indices: &[usize]) -> Result<()> {
        if output.len != active_indices.len() {
            return Err(NobleError::InvalidArgument(format!(
                "derivative output has {} slots but {} active parameters were given",
                output.len,
                active_indices.len()
            )));
        }

        self.information.clear();
        for (position, &global) in active_indices.iter().enumerate() {
            let slot = output.offset + position;
            match self.bindings.iter().position(|&bound| bound == global) {
                Some(local) => self.information.push((DerivativeTarget::Parameter(local), slot)),
                None if self.other == OtherParameters::Track => {
                    self.information.push((DerivativeTarget::Other, slot))
                }
                None => {}
            }
        }
        self.configured = true;
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Tracked `(parameter, slot)` pairs in active-index order.
    pub fn derivative_information(&self) -> &[(DerivativeTarget, usize)] {
        &self.information
    }

    /// Slot of a local parameter, if it is active.
    pub fn slot_of(&self, local: usize) -> Option<usize> {
        self.information
            .iter()
            .find(|(target, _)| *target == DerivativeTarget::Parameter(local))
            .map(|&(_, slot)| slot)
    }

    /// Slot of a parameter by name.
    ///
    /// Fails with `UnknownParameter` when the name is not registered in `set`
    /// or the parameter is not one of this collector's own.
    pub fn slot_of_name(&self, set: &ParameterSet, name: &str) -> Result<Option<usize>> {
        let global = set.index_of(name)?;
        let local = self
            .bindings
            .iter()
            .position(|&bound| bound == global)
            .ok_or_else(|| NobleError::UnknownParameter(name.to_string()))?;
        Ok(self.slot_of(local))
    }

    /// Visit every tracked slot once.
    ///
    /// # Panics
    /// Panics if `row` is shorter than the configured window.
    pub fn for_each_slot(&self, row: &mut [f64], mut f: impl FnMut(DerivativeTarget, &mut f64)) {
        for &(target, slot) in &self.information {
            f(target, &mut row[slot]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::standard;

    const T: usize = 0;
    const S: usize = 1;
    const P: usize = 2;

    /// Collector for a method whose (T, S, p) live at the given global indices.
    fn method_collector(p: usize, s: usize, t: usize) -> DerivativeCollector {
        DerivativeCollector::new(vec![t, s, p], OtherParameters::Ignore)
    }

    #[test]
    fn maps_active_positions_to_slots() {
        let mut collector = method_collector(2, 0, 5);
        let output = vec![0.0; 6];
        collector
            .set_derivatives_and_results_vector(SlotRange::whole(output.len()), &[1, 2, 0, 3, 5, 4])
            .unwrap();

        assert_eq!(collector.slot_of(P), Some(1));
        assert_eq!(collector.slot_of(S), Some(2));
        assert_eq!(collector.slot_of(T), Some(4));
        assert_eq!(collector.derivative_information().len(), 3);
    }

    #[test]
    fn reconfiguration_discards_old_mapping() {
        let mut collector = method_collector(2, 4, 9);
        collector
            .set_derivatives_and_results_vector(SlotRange::whole(5), &[9, 4, 2, 0, 1])
            .unwrap();
        assert_eq!(collector.derivative_information().len(), 3);

        collector
            .set_derivatives_and_results_vector(SlotRange::whole(3), &[7, 2, 4])
            .unwrap();
        let info = collector.derivative_information();
        assert_eq!(info.len(), 2);
        assert_eq!(info.iter().filter(|(_, slot)| *slot == 1).count(), 1);
        assert_eq!(info.iter().filter(|(_, slot)| *slot == 2).count(), 1);
        assert_eq!(collector.slot_of(P), Some(1));
        assert_eq!(collector.slot_of(S), Some(2));
        assert_eq!(collector.slot_of(T), None);
    }

    #[test]
    fn length_mismatch_is_invalid_argument() {
        let mut collector = method_collector(2, 0, 5);
        let err = collector
            .set_derivatives_and_results_vector(SlotRange::whole(6), &[0, 1, 2, 3, 4])
            .unwrap_err();
        assert!(matches!(err, NobleError::InvalidArgument(_)));
        assert!(!collector.is_configured());

        collector
            .set_derivatives_and_results_vector(SlotRange::whole(5), &[0, 1, 2, 3, 4])
            .unwrap();
        assert!(collector.is_configured());
    }

    #[test]
    fn tracks_foreign_parameters_as_other() {
        let mut collector = DerivativeCollector::new(vec![3], OtherParameters::Track);
        collector
            .set_derivatives_and_results_vector(SlotRange::new(4, 3), &[0, 3, 1])
            .unwrap();
        assert_eq!(
            collector.derivative_information(),
            &[
                (DerivativeTarget::Other, 4),
                (DerivativeTarget::Parameter(0), 5),
                (DerivativeTarget::Other, 6),
            ]
        );
    }

    #[test]
    fn for_each_slot_visits_each_tracked_slot_once() {
        let mut collector = method_collector(0, 1, 2);
        collector
            .set_derivatives_and_results_vector(SlotRange::whole(4), &[2, 3, 0, 1])
            .unwrap();
        let mut row = vec![0.0; 4];
        collector.for_each_slot(&mut row, |_, slot| *slot += 1.0);
        assert_eq!(row, vec![1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn named_lookup_distinguishes_unknown_and_inactive() {
        let mut set = ParameterSet::new();
        let t = set.register(standard::temperature());
        let s = set.register(standard::salinity());
        let p = set.register(standard::pressure());
        set.register(standard::excess_air());

        let mut collector = method_collector(p, s, t);
        collector
            .set_derivatives_and_results_vector(SlotRange::whole(1), &[t])
            .unwrap();

        assert_eq!(collector.slot_of_name(&set, "T").unwrap(), Some(0));
        assert_eq!(collector.slot_of_name(&set, "S").unwrap(), None);
        assert!(collector.slot_of_name(&set, "A").is_err());
        assert!(collector.slot_of_name(&set, "beta").is_err());
    }
}
