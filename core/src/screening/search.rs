use crate::catalog::TrackedObject;
use crate::math::Vec3;
use crate::prelude::ScreeningConfig;
use crate::resolver::{OrbitalStateResolver, StateVector};

/// Best sampled approach for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub miss_distance_km: f64,
    pub relative_velocity_km_s: f64,
    pub minutes: f64,
    /// Primary object's position at the chosen sample.
    pub collision_point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchOutcome {
    /// `None` when no sample produced a finite separation.
    pub approach: Option<ClosestApproach>,
    pub unresolved_samples: usize,
}

/// Time-stepped closest-approach search over a bounded horizon.
///
/// Both trajectories are sampled at `k * horizon / steps` for `k = 0..=steps`
/// and the smallest separation among those samples is kept. This is a
/// discrete approximation: a true minimum that falls strictly between two
/// samples is reported as the nearer of its neighbours, so fast crossings can
/// be overestimated or missed outright. Raise `steps` to tighten the grid.
#[derive(Debug, Clone, Copy)]
pub struct ClosestApproachSearch {
    horizon_minutes: f64,
    steps: usize,
}

impl ClosestApproachSearch {
    pub fn new(horizon_minutes: f64, steps: usize) -> Self {
        Self {
            horizon_minutes,
            steps,
        }
    }

    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self::new(config.horizon_minutes, config.steps)
    }

    pub fn sample_count(&self) -> usize {
        self.steps + 1
    }

    pub fn sample_minutes(&self, k: usize) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        k as f64 * self.horizon_minutes / self.steps as f64
    }

    /// Resolves one object across the whole sampling grid.
    pub fn trajectory<R>(&self, resolver: &R, object: &TrackedObject) -> Vec<Option<StateVector>>
    where
        R: OrbitalStateResolver + ?Sized,
    {
        (0..self.sample_count())
            .map(|k| {
                resolver
                    .resolve(object, self.sample_minutes(k))
                    .filter(StateVector::is_finite)
            })
            .collect()
    }

    /// Samples the resolver directly for a pair.
    pub fn search<R>(&self, resolver: &R, a: &TrackedObject, b: &TrackedObject) -> SearchOutcome
    where
        R: OrbitalStateResolver + ?Sized,
    {
        let first = self.trajectory(resolver, a);
        let second = self.trajectory(resolver, b);
        self.closest(&first, &second)
    }

    /// Minimum separation between two pre-resolved trajectories. Samples where
    /// either side is missing are skipped and counted; ties keep the earliest
    /// sample.
    pub fn closest(
        &self,
        first: &[Option<StateVector>],
        second: &[Option<StateVector>],
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for (k, (a, b)) in first.iter().zip(second.iter()).enumerate() {
            let (a, b) = match (a, b) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    outcome.unresolved_samples += 1;
                    continue;
                }
            };

            let distance = a.position.distance(&b.position);
            if !distance.is_finite() {
                outcome.unresolved_samples += 1;
                continue;
            }

            let closer = outcome
                .approach
                .map_or(true, |best| distance < best.miss_distance_km);
            if closer {
                outcome.approach = Some(ClosestApproach {
                    miss_distance_km: distance,
                    relative_velocity_km_s: (a.velocity - b.velocity).norm(),
                    minutes: self.sample_minutes(k),
                    collision_point: a.position,
                });
            }
        }

        outcome
    }
}
