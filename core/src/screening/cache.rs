use crate::resolver::StateVector;
use std::sync::OnceLock;

type Trajectory = Vec<Option<StateVector>>;

/// Per-cycle memo of resolved trajectories, indexed like the input snapshot.
///
/// Built at the start of a cycle and dropped with its report, so no resolver
/// output leaks from one cycle into the next. Each slot is filled at most once,
/// so concurrent workers share one resolution per object.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryCache {
    trajectories: Vec<OnceLock<Trajectory>>,
}

impl TrajectoryCache {
    pub fn with_len(objects: usize) -> Self {
        Self {
            trajectories: (0..objects).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Stores a trajectory unless the slot is already filled.
    pub fn insert(&self, index: usize, trajectory: Trajectory) -> bool {
        self.trajectories
            .get(index)
            .map_or(false, |slot| slot.set(trajectory).is_ok())
    }

    pub fn get(&self, index: usize) -> Option<&[Option<StateVector>]> {
        self.trajectories.get(index)?.get().map(Vec::as_slice)
    }

    /// Cached trajectory for `index`, running `resolve` on first use.
    pub fn get_or_resolve<F>(&self, index: usize, resolve: F) -> Option<&[Option<StateVector>]>
    where
        F: FnOnce() -> Trajectory,
    {
        Some(self.trajectories.get(index)?.get_or_init(resolve).as_slice())
    }

    /// Number of objects with a cached trajectory.
    pub fn resolved(&self) -> usize {
        self.trajectories
            .iter()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// State at the cycle epoch, if it was resolved.
    pub fn epoch_state(&self, index: usize) -> Option<StateVector> {
        self.get(index)?.first().copied().flatten()
    }
}
