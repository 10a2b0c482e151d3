use crate::catalog::TrackedObject;

/// Coarse altitude-band gate applied before any resolver work.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    altitude_gate_km: f64,
}

/// Index pairs that survived the gate, plus bookkeeping for the report.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub pairs: Vec<(usize, usize)>,
    pub pairs_considered: usize,
    /// Objects dropped as malformed (no usable altitude).
    pub excluded: Vec<usize>,
}

impl CandidateFilter {
    pub fn new(altitude_gate_km: f64) -> Self {
        Self { altitude_gate_km }
    }

    /// True when the pair sits within the same altitude band. Objects without a
    /// finite altitude never pass.
    pub fn admits(&self, a: &TrackedObject, b: &TrackedObject) -> bool {
        match (a.gate_altitude(), b.gate_altitude()) {
            (Some(alt_a), Some(alt_b)) => (alt_a - alt_b).abs() <= self.altitude_gate_km,
            _ => false,
        }
    }

    pub fn candidate_pairs(&self, objects: &[TrackedObject]) -> CandidateSet {
        let (valid, excluded): (Vec<usize>, Vec<usize>) =
            (0..objects.len()).partition(|&index| objects[index].gate_altitude().is_some());

        let mut pairs = Vec::new();
        for (offset, &i) in valid.iter().enumerate() {
            for &j in &valid[offset + 1..] {
                if self.admits(&objects[i], &objects[j]) {
                    pairs.push((i, j));
                }
            }
        }

        let n = objects.len();
        CandidateSet {
            pairs,
            pairs_considered: n * n.saturating_sub(1) / 2,
            excluded,
        }
    }
}
