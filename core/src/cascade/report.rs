use crate::cascade::fragments::DebrisCascadeSimulator;
use crate::cascade::impact::ImpactAssessor;
use crate::catalog::{Conjunction, DebrisFragment, ImpactRecord, TrackedObject};
use crate::math::StatsHelper;
use crate::prelude::{CascadeConfig, ScreeningError, ScreeningResult};
use crate::resolver::OrbitalStateResolver;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub fragment_count: usize,
    pub mean_fragment_size: f64,
    pub max_perturbation_km_s: f64,
    pub threatened_objects: usize,
}

/// Fragments and threatened objects for one selected conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub conjunction: Conjunction,
    pub fragments: Vec<DebrisFragment>,
    pub impacts: Vec<ImpactRecord>,
    pub summary: CascadeSummary,
}

impl CascadeReport {
    /// Simulates the fragment field of `conjunction` and assesses it against
    /// the catalog.
    pub fn build<R, G>(
        conjunction: &Conjunction,
        catalog: &[TrackedObject],
        resolver: &R,
        config: &CascadeConfig,
        rng: &mut G,
        created_at: f64,
    ) -> Self
    where
        R: OrbitalStateResolver + ?Sized,
        G: Rng,
    {
        let fragments =
            DebrisCascadeSimulator::new(config.clone()).simulate(conjunction, rng, created_at);
        let impacts =
            ImpactAssessor::new(config.impact_radius_km).assess(&fragments, catalog, resolver);

        let sizes: Vec<f64> = fragments.iter().map(|f| f.size).collect();
        let speeds: Vec<f64> = fragments
            .iter()
            .map(|f| f.velocity_perturbation.norm())
            .collect();
        let summary = CascadeSummary {
            fragment_count: fragments.len(),
            mean_fragment_size: StatsHelper::mean(&sizes),
            max_perturbation_km_s: StatsHelper::max(&speeds),
            threatened_objects: impacts.len(),
        };

        Self {
            conjunction: conjunction.clone(),
            fragments,
            impacts,
            summary,
        }
    }

    pub fn to_json(&self) -> ScreeningResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ScreeningError::Internal(format!("serializing cascade report: {err}")))
    }
}
