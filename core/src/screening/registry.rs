use crate::catalog::Conjunction;
use crate::prelude::DEFAULT_MAX_RESULTS;
use std::cmp::Ordering;

/// Collects one cycle's qualifying conjunctions and hands back the most
/// actionable ones: soonest first, closer misses breaking ties, bounded to
/// `max_results` so a dense catalog cannot flood downstream consumers.
#[derive(Debug, Clone)]
pub struct ConjunctionRegistry {
    max_results: usize,
    entries: Vec<Conjunction>,
}

impl ConjunctionRegistry {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, conjunction: Conjunction) {
        self.entries.push(conjunction);
    }

    pub fn extend<I: IntoIterator<Item = Conjunction>>(&mut self, conjunctions: I) {
        self.entries.extend(conjunctions);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_ranked(mut self) -> Vec<Conjunction> {
        self.entries.sort_by(urgency);
        self.entries.truncate(self.max_results);
        self.entries
    }
}

impl Default for ConjunctionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

fn urgency(a: &Conjunction, b: &Conjunction) -> Ordering {
    a.time_to_closest_approach_min
        .total_cmp(&b.time_to_closest_approach_min)
        .then_with(|| a.miss_distance_km.total_cmp(&b.miss_distance_km))
}
