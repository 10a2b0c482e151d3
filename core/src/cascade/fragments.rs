use crate::catalog::{Conjunction, DebrisFragment, FragmentOrigin};
use crate::math::Vec3;
use crate::prelude::CascadeConfig;
use crate::telemetry::log::LogManager;
use rand::Rng;

/// Synthesizes a fragment population for one conjunction.
///
/// Fragment count grows linearly with relative velocity and is deterministic;
/// perturbations and sizes come from the injected random source.
pub struct DebrisCascadeSimulator {
    config: CascadeConfig,
    logger: LogManager,
}

impl DebrisCascadeSimulator {
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("cascade"),
        }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// `floor(base + relative_velocity * per_km_s)`, clamped to `max_fragments`.
    /// Unusable velocities count as zero.
    pub fn fragment_count(&self, relative_velocity_km_s: f64) -> usize {
        let velocity = sanitize(relative_velocity_km_s);
        let ceiling = self.config.max_fragments;
        let count =
            (self.config.base_fragments + velocity * self.config.fragments_per_km_s).floor();
        if count.is_nan() || count <= 0.0 {
            0
        } else if count >= ceiling as f64 {
            ceiling
        } else {
            count as usize
        }
    }

    pub fn simulate<G: Rng>(
        &self,
        conjunction: &Conjunction,
        rng: &mut G,
        created_at: f64,
    ) -> Vec<DebrisFragment> {
        let velocity = sanitize(conjunction.relative_velocity_km_s);
        let spread = velocity * self.config.spread_factor;
        let count = self.fragment_count(velocity);
        let origin = FragmentOrigin {
            primary_id: conjunction.primary_id.clone(),
            secondary_id: conjunction.secondary_id.clone(),
        };

        let fragments: Vec<DebrisFragment> = (0..count)
            .map(|_| {
                let velocity_perturbation = Vec3::new(
                    (rng.gen::<f64>() - 0.5) * spread,
                    (rng.gen::<f64>() - 0.5) * spread,
                    (rng.gen::<f64>() - 0.5) * spread,
                );
                DebrisFragment {
                    origin: origin.clone(),
                    position: conjunction.collision_point,
                    velocity_perturbation,
                    size: rng.gen::<f64>() * self.config.max_fragment_size,
                    created_at,
                }
            })
            .collect();

        self.logger.record(&format!(
            "{} x {} at {:.2} km/s -> {} fragments",
            conjunction.primary_id,
            conjunction.secondary_id,
            velocity,
            fragments.len()
        ));
        fragments
    }
}

impl Default for DebrisCascadeSimulator {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

fn sanitize(velocity: f64) -> f64 {
    if velocity.is_finite() && velocity > 0.0 {
        velocity
    } else {
        0.0
    }
}
