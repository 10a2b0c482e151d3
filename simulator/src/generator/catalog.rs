use anyhow::{bail, Context};
use conjcore::catalog::{OrbitDescriptor, TrackedObject};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic tracked-object catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Background population spread over the shells.
    pub objects: usize,
    pub shells_km: Vec<f64>,
    pub altitude_jitter_km: f64,
    /// Crossing pairs placed to meet inside the horizon.
    pub encounters: usize,
    pub horizon_minutes: f64,
    pub seed: u64,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            objects: 200,
            shells_km: vec![550.0, 780.0, 1200.0],
            altitude_jitter_km: 15.0,
            encounters: 3,
            horizon_minutes: 30.0,
            seed: 0,
            description: None,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    fn label(&self) -> &str {
        self.scenario.as_deref().unwrap_or("SYN")
    }
}

/// Circular orbit phased so that argument of latitude is zero at `minute`.
fn phased_orbit(
    altitude_km: f64,
    inclination_deg: f64,
    node_deg: f64,
    minute: f64,
) -> OrbitDescriptor {
    let probe = OrbitDescriptor::new(altitude_km, inclination_deg, 0.0, node_deg);
    let phase_deg = -(probe.mean_motion_rad_s() * minute * 60.0).to_degrees();
    OrbitDescriptor::new(altitude_km, inclination_deg, phase_deg, node_deg)
}

pub fn build_catalog_from_config(config: &GeneratorConfig) -> anyhow::Result<Vec<TrackedObject>> {
    if config.shells_km.is_empty() {
        bail!("generator needs at least one altitude shell");
    }
    if !config.altitude_jitter_km.is_finite() || !config.horizon_minutes.is_finite() {
        bail!("generator jitter and horizon must be finite");
    }
    let total = config
        .encounters
        .checked_mul(2)
        .and_then(|paired| paired.checked_add(config.objects))
        .context("overflow computing catalog size for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut catalog = Vec::with_capacity(total);
    let jitter = config.altitude_jitter_km.abs();

    for index in 0..config.objects {
        let shell = config.shells_km[index % config.shells_km.len()];
        let orbit = OrbitDescriptor::new(
            shell + rng.gen_range(-jitter..=jitter),
            rng.gen_range(0.0..98.0),
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
        );
        catalog.push(TrackedObject::with_orbit(
            format!("GEN-{index:05}"),
            format!("{} {}", config.label(), index),
            orbit,
        ));
    }

    // Meeting minutes are whole minutes so a one-sample-per-minute grid hits them.
    let last_minute = config.horizon_minutes.floor().max(0.0) as u32;
    for encounter in 0..config.encounters {
        let shell = config.shells_km[encounter % config.shells_km.len()];
        let minute = if last_minute > 1 {
            rng.gen_range(1..last_minute) as f64
        } else {
            0.0
        };
        let node = rng.gen_range(0.0..360.0);
        let inclination = rng.gen_range(20.0..60.0);
        let crossing = inclination + rng.gen_range(30.0..60.0);
        let radial_offset = rng.gen_range(0.01..0.08);

        catalog.push(TrackedObject::with_orbit(
            format!("ENC-{encounter}-A"),
            format!("{} encounter {} A", config.label(), encounter),
            phased_orbit(shell, inclination, node, minute),
        ));
        catalog.push(TrackedObject::with_orbit(
            format!("ENC-{encounter}-B"),
            format!("{} encounter {} B", config.label(), encounter),
            phased_orbit(shell + radial_offset, crossing, node, minute),
        ));
    }

    log::debug!(
        "generated {} objects ({} encounter pairs) with seed {}",
        catalog.len(),
        config.encounters,
        config.seed
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conjcore::catalog::RiskTier;
    use conjcore::resolver::CircularOrbitResolver;
    use conjcore::screening::DetectionCycle;
    use conjcore::ScreeningConfig;

    fn build_catalog(objects: usize, seed: u64) -> anyhow::Result<Vec<TrackedObject>> {
        build_catalog_from_config(&GeneratorConfig {
            objects,
            seed,
            ..Default::default()
        })
    }

    #[test]
    fn generator_builds_expected_object_count() {
        let catalog = build_catalog(40, 1).unwrap();
        assert_eq!(catalog.len(), 40 + 2 * 3);
        assert!(catalog.iter().all(|object| object.orbit.is_some()));
    }

    #[test]
    fn same_seed_reproduces_catalog() {
        assert_eq!(build_catalog(25, 9).unwrap(), build_catalog(25, 9).unwrap());
        assert_ne!(build_catalog(25, 9).unwrap(), build_catalog(25, 10).unwrap());
    }

    #[test]
    fn background_altitudes_stay_near_shells() {
        let config = GeneratorConfig {
            objects: 60,
            shells_km: vec![550.0],
            altitude_jitter_km: 10.0,
            encounters: 0,
            ..Default::default()
        };
        let catalog = build_catalog_from_config(&config).unwrap();
        for object in catalog {
            let altitude = object.altitude_km.unwrap();
            assert!((540.0..=560.0).contains(&altitude));
        }
    }

    #[test]
    fn injected_encounters_are_screened_as_critical() {
        let config = GeneratorConfig {
            objects: 0,
            encounters: 3,
            seed: 5,
            scenario: Some("load test".into()),
            ..Default::default()
        };
        let catalog = build_catalog_from_config(&config).unwrap();
        let report = DetectionCycle::new(ScreeningConfig::default(), CircularOrbitResolver::new())
            .unwrap()
            .run(&catalog, 0.0)
            .unwrap();

        assert_eq!(report.conjunctions.len(), 3);
        for conjunction in &report.conjunctions {
            assert_eq!(conjunction.risk_tier, RiskTier::Critical);
            let pair = conjunction.primary_id.trim_end_matches("-A");
            assert_eq!(conjunction.secondary_id, format!("{pair}-B"));
        }
    }

    #[test]
    fn empty_shell_list_rejected() {
        let config = GeneratorConfig {
            shells_km: Vec::new(),
            ..Default::default()
        };
        assert!(build_catalog_from_config(&config).is_err());
    }
}
