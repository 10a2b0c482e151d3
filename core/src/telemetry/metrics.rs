use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<ScreeningMetrics>,
}

/// Counters accumulated across detection cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreeningMetrics {
    pub cycles: usize,
    pub partial_cycles: usize,
    pub skipped_cycles: usize,
    pub pairs_evaluated: usize,
    pub unresolved_samples: usize,
    pub conjunctions: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ScreeningMetrics::default()),
        }
    }

    pub fn record_cycle(
        &self,
        partial: bool,
        pairs_evaluated: usize,
        unresolved_samples: usize,
        conjunctions: usize,
    ) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
            if partial {
                metrics.partial_cycles += 1;
            }
            metrics.pairs_evaluated += pairs_evaluated;
            metrics.unresolved_samples += unresolved_samples;
            metrics.conjunctions += conjunctions;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped_cycles += 1;
        }
    }

    pub fn snapshot(&self) -> ScreeningMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_across_cycles() {
        let recorder = MetricsRecorder::new();
        recorder.record_cycle(false, 10, 2, 1);
        recorder.record_cycle(true, 4, 0, 0);
        recorder.record_skipped();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.partial_cycles, 1);
        assert_eq!(snapshot.skipped_cycles, 1);
        assert_eq!(snapshot.pairs_evaluated, 14);
        assert_eq!(snapshot.unresolved_samples, 2);
        assert_eq!(snapshot.conjunctions, 1);
    }
}
