use crate::catalog::TrackedObject;
use crate::prelude::{ScreeningError, ScreeningResult};
use crate::resolver::OrbitalStateResolver;
use crate::screening::cycle::{CycleReport, DetectionCycle};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use std::sync::{Mutex, TryLockError};

/// Repeated detection cycles that never overlap.
///
/// Holding the guard for the duration of a cycle bounds concurrent resolver
/// load to one cycle's worth of workers.
pub struct DetectionLoop<R> {
    cycle: DetectionCycle<R>,
    guard: Mutex<()>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl<R> DetectionLoop<R>
where
    R: OrbitalStateResolver + Sync,
{
    pub fn new(cycle: DetectionCycle<R>) -> Self {
        Self {
            cycle,
            guard: Mutex::new(()),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("detection-loop"),
        }
    }

    pub fn cycle(&self) -> &DetectionCycle<R> {
        &self.cycle
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Waits for any running cycle to return, then runs a fresh one.
    pub fn run_cycle(&self, objects: &[TrackedObject], epoch: f64) -> ScreeningResult<CycleReport> {
        // A poisoned guard only means an earlier cycle panicked; cycles share no state.
        let _running = self
            .guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.execute(objects, epoch)
    }

    /// Runs a cycle only if none is in flight.
    pub fn try_run_cycle(
        &self,
        objects: &[TrackedObject],
        epoch: f64,
    ) -> ScreeningResult<CycleReport> {
        let _running = match self.guard.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                self.metrics.record_skipped();
                self.logger.detail("previous cycle still running, skipping tick");
                return Err(ScreeningError::CycleInProgress);
            }
        };
        self.execute(objects, epoch)
    }

    fn execute(&self, objects: &[TrackedObject], epoch: f64) -> ScreeningResult<CycleReport> {
        let report = self.cycle.run(objects, epoch)?;
        self.metrics.record_cycle(
            report.is_partial(),
            report.pairs_evaluated,
            report.unresolved_samples,
            report.conjunctions.len(),
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ScreeningConfig;
    use crate::resolver::StateVector;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Blocks the first resolve call until released.
    struct GatedResolver {
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl OrbitalStateResolver for GatedResolver {
        fn resolve(&self, _object: &TrackedObject, _minutes_ahead: f64) -> Option<StateVector> {
            if let Some(entered) = self.entered.lock().unwrap().take() {
                entered.send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            None
        }
    }

    fn objects() -> Vec<TrackedObject> {
        vec![
            TrackedObject::new("a", "a", 550.0),
            TrackedObject::new("b", "b", 551.0),
        ]
    }

    #[test]
    fn overlapping_tick_is_skipped() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let resolver = GatedResolver {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
        };
        let detection = Arc::new(DetectionLoop::new(
            DetectionCycle::new(ScreeningConfig::default(), resolver).unwrap(),
        ));

        let background = {
            let detection = Arc::clone(&detection);
            thread::spawn(move || detection.run_cycle(&objects(), 0.0))
        };
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let overlapping = detection.try_run_cycle(&objects(), 0.0);
        assert!(matches!(overlapping, Err(ScreeningError::CycleInProgress)));

        release_tx.send(()).unwrap();
        let first = background.join().unwrap().unwrap();
        assert!(first.conjunctions.is_empty());

        // With the first cycle finished the next tick runs.
        assert!(detection.try_run_cycle(&objects(), 60.0).is_ok());
        let metrics = detection.metrics().snapshot();
        assert_eq!(metrics.cycles, 2);
        assert_eq!(metrics.skipped_cycles, 1);
    }
}
