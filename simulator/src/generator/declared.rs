use conjcore::catalog::{OrbitDescriptor, TrackedObject};
use conjcore::resolver::{Ephemeris, EphemerisResolver, StateVector};
use serde::{Deserialize, Serialize};

/// Pre-propagated states handed over by an external propagator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisEntry {
    pub step_minutes: f64,
    pub states: Vec<StateVector>,
}

/// One catalog object as written in a workflow file.
///
/// Altitude comes from `mean_motion` (revolutions per day) when given, else
/// from `altitude_km`. Entries with neither are kept; the screening core
/// excludes them from each cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub altitude_km: Option<f64>,
    #[serde(default)]
    pub mean_motion: Option<f64>,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub phase_deg: f64,
    #[serde(default)]
    pub reference_longitude_deg: f64,
    #[serde(default)]
    pub ephemeris: Option<EphemerisEntry>,
}

impl CatalogEntry {
    pub fn to_tracked_object(&self) -> TrackedObject {
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        let orbit = match (self.mean_motion, self.altitude_km) {
            (Some(mean_motion), _) => OrbitDescriptor::from_mean_motion(
                mean_motion,
                self.inclination_deg,
                self.phase_deg,
                self.reference_longitude_deg,
            ),
            (None, Some(altitude)) => Some(OrbitDescriptor::new(
                altitude,
                self.inclination_deg,
                self.phase_deg,
                self.reference_longitude_deg,
            )),
            (None, None) => None,
        };

        match orbit {
            Some(orbit) => TrackedObject::with_orbit(self.id.clone(), name, orbit),
            None => TrackedObject {
                id: self.id.clone(),
                name,
                altitude_km: None,
                orbit: None,
            },
        }
    }
}

pub fn build_declared_catalog(entries: &[CatalogEntry]) -> Vec<TrackedObject> {
    entries.iter().map(CatalogEntry::to_tracked_object).collect()
}

pub fn build_ephemeris_resolver(entries: &[CatalogEntry]) -> EphemerisResolver {
    let mut resolver = EphemerisResolver::new();
    for entry in entries {
        if let Some(table) = &entry.ephemeris {
            resolver.insert(
                entry.id.clone(),
                Ephemeris::new(table.step_minutes, table.states.clone()),
            );
        }
    }
    resolver
}

#[cfg(test)]
mod tests {
    use super::*;
    use conjcore::resolver::OrbitalStateResolver;

    fn entries() -> Vec<CatalogEntry> {
        serde_yaml::from_str(
            r#"
- id: "25544"
  name: ISS
  mean_motion: 15.5
  inclination_deg: 51.6
- id: "90001"
  altitude_km: 550.0
  ephemeris:
    step_minutes: 15.0
    states:
      - position: { x: 6921.0, y: 0.0, z: 0.0 }
        velocity: { x: 0.0, y: 7.6, z: 0.0 }
      - position: { x: 0.0, y: 6921.0, z: 0.0 }
        velocity: { x: -7.6, y: 0.0, z: 0.0 }
- id: "90002"
"#,
        )
        .unwrap()
    }

    #[test]
    fn mean_motion_entry_derives_altitude() {
        let catalog = build_declared_catalog(&entries());
        let station = &catalog[0];
        assert_eq!(station.name, "ISS");
        let altitude = station.altitude_km.unwrap();
        assert!(altitude > 380.0 && altitude < 460.0);
        assert_eq!(station.orbit.unwrap().inclination_deg, 51.6);
    }

    #[test]
    fn entry_without_altitude_stays_malformed() {
        let catalog = build_declared_catalog(&entries());
        assert_eq!(catalog[2].name, "90002");
        assert!(catalog[2].altitude_km.is_none());
    }

    #[test]
    fn ephemeris_tables_feed_resolver() {
        let entries = entries();
        let resolver = build_ephemeris_resolver(&entries);
        assert_eq!(resolver.len(), 1);
        let catalog = build_declared_catalog(&entries);
        let state = resolver.resolve(&catalog[1], 15.0).unwrap();
        assert_eq!(state.position.y, 6921.0);
        assert!(resolver.resolve(&catalog[0], 0.0).is_none());
    }
}
