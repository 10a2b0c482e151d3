use crate::catalog::debris::DEBRIS_PATH_REASON;
use crate::catalog::{DebrisFragment, ImpactRecord, RiskTier, TrackedObject};
use crate::prelude::IMPACT_RADIUS_KM;
use crate::resolver::OrbitalStateResolver;
use crate::telemetry::log::LogManager;
use std::collections::HashSet;

/// Flags catalog objects whose last-known position falls inside the debris
/// footprint. Plain 3D proximity, no flux or probability weighting.
pub struct ImpactAssessor {
    radius_km: f64,
    logger: LogManager,
}

impl ImpactAssessor {
    pub fn new(radius_km: f64) -> Self {
        Self {
            radius_km,
            logger: LogManager::new("impact"),
        }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Objects that produced the fragments are not reported against their own
    /// debris. Objects the resolver cannot place are left out.
    pub fn assess<R>(
        &self,
        fragments: &[DebrisFragment],
        catalog: &[TrackedObject],
        resolver: &R,
    ) -> Vec<ImpactRecord>
    where
        R: OrbitalStateResolver + ?Sized,
    {
        if fragments.is_empty() {
            return Vec::new();
        }
        let parents: HashSet<&str> = fragments
            .iter()
            .flat_map(|f| [f.origin.primary_id.as_str(), f.origin.secondary_id.as_str()])
            .collect();

        let mut impacts = Vec::new();
        for object in catalog {
            if parents.contains(object.id.as_str()) {
                continue;
            }
            let Some(state) = resolver.resolve(object, 0.0).filter(|s| s.is_finite()) else {
                self.logger
                    .detail(&format!("no position for {}, skipping", object.id));
                continue;
            };

            let nearest = fragments
                .iter()
                .map(|fragment| fragment.position.distance(&state.position))
                .fold(f64::INFINITY, f64::min);
            if nearest <= self.radius_km {
                impacts.push(ImpactRecord {
                    object_id: object.id.clone(),
                    object_name: object.name.clone(),
                    reason: DEBRIS_PATH_REASON.to_string(),
                    risk_level: RiskTier::Elevated,
                    nearest_fragment_km: nearest,
                });
            }
        }

        self.logger.record(&format!(
            "{} of {} objects inside {:.0} km debris footprint",
            impacts.len(),
            catalog.len(),
            self.radius_km
        ));
        impacts
    }
}

impl Default for ImpactAssessor {
    fn default() -> Self {
        Self::new(IMPACT_RADIUS_KM)
    }
}
