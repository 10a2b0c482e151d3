use crate::catalog::TrackedObject;
use crate::resolver::{OrbitalStateResolver, StateVector};
use std::collections::HashMap;

/// States produced by an external propagator at a fixed cadence starting at
/// the cycle epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct Ephemeris {
    pub step_minutes: f64,
    pub states: Vec<StateVector>,
}

impl Ephemeris {
    pub fn new(step_minutes: f64, states: Vec<StateVector>) -> Self {
        Self {
            step_minutes,
            states,
        }
    }

    pub fn span_minutes(&self) -> f64 {
        self.states.len().saturating_sub(1) as f64 * self.step_minutes
    }

    /// Linear interpolation between the bracketing states. Offsets outside the
    /// covered span are unresolvable.
    pub fn state_at(&self, minutes_ahead: f64) -> Option<StateVector> {
        if self.states.is_empty()
            || !self.step_minutes.is_finite()
            || self.step_minutes <= 0.0
            || !minutes_ahead.is_finite()
            || minutes_ahead < 0.0
            || minutes_ahead > self.span_minutes()
        {
            return None;
        }

        let scaled = minutes_ahead / self.step_minutes;
        let index = (scaled.floor() as usize).min(self.states.len() - 1);
        let fraction = scaled - index as f64;
        let start = self.states[index];
        let state = match self.states.get(index + 1) {
            Some(end) if fraction > 0.0 => StateVector::new(
                start.position.lerp(&end.position, fraction),
                start.velocity.lerp(&end.velocity, fraction),
            ),
            _ => start,
        };
        state.is_finite().then_some(state)
    }
}

/// Resolver backed by per-object ephemeris tables, keyed by object id.
#[derive(Debug, Clone, Default)]
pub struct EphemerisResolver {
    tables: HashMap<String, Ephemeris>,
}

impl EphemerisResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object_id: impl Into<String>, ephemeris: Ephemeris) {
        self.tables.insert(object_id.into(), ephemeris);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl OrbitalStateResolver for EphemerisResolver {
    fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
        self.tables.get(&object.id)?.state_at(minutes_ahead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn table() -> Ephemeris {
        Ephemeris::new(
            10.0,
            vec![
                StateVector::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
                StateVector::new(Vec3::new(600.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
                StateVector::new(Vec3::new(1200.0, 60.0, 0.0), Vec3::new(1.0, 0.2, 0.0)),
            ],
        )
    }

    #[test]
    fn interpolates_between_samples() {
        let state = table().state_at(15.0).unwrap();
        assert_eq!(state.position, Vec3::new(900.0, 30.0, 0.0));
        assert_eq!(state.velocity, Vec3::new(1.0, 0.1, 0.0));
    }

    #[test]
    fn exact_sample_offsets_return_table_values() {
        let ephemeris = table();
        assert_eq!(ephemeris.state_at(0.0).unwrap().position, Vec3::ZERO);
        assert_eq!(
            ephemeris.state_at(20.0).unwrap().position,
            Vec3::new(1200.0, 60.0, 0.0)
        );
    }

    #[test]
    fn offsets_outside_span_are_unresolvable() {
        let ephemeris = table();
        assert!(ephemeris.state_at(-0.5).is_none());
        assert!(ephemeris.state_at(20.5).is_none());
    }

    #[test]
    fn unknown_object_is_unresolvable() {
        let mut resolver = EphemerisResolver::new();
        resolver.insert("A", table());
        assert_eq!(resolver.len(), 1);
        let known = TrackedObject::new("A", "known", 500.0);
        let unknown = TrackedObject::new("B", "unknown", 500.0);
        assert!(resolver.resolve(&known, 5.0).is_some());
        assert!(resolver.resolve(&unknown, 5.0).is_none());
    }
}
