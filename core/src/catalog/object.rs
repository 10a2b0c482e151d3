use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Earth's gravitational parameter.
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Simplified analytic orbit: circular, fixed plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitDescriptor {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    /// Argument of latitude at the cycle epoch.
    pub phase_deg: f64,
    /// Right ascension of the ascending node.
    pub reference_longitude_deg: f64,
}

impl OrbitDescriptor {
    pub fn new(
        altitude_km: f64,
        inclination_deg: f64,
        phase_deg: f64,
        reference_longitude_deg: f64,
    ) -> Self {
        Self {
            altitude_km,
            inclination_deg,
            phase_deg,
            reference_longitude_deg,
        }
    }

    /// Builds a descriptor from an element-set mean motion (revolutions per
    /// day), deriving the altitude from Kepler's third law. Returns `None` for
    /// a non-positive or non-finite mean motion.
    pub fn from_mean_motion(
        mean_motion_rev_per_day: f64,
        inclination_deg: f64,
        phase_deg: f64,
        reference_longitude_deg: f64,
    ) -> Option<Self> {
        let altitude_km = altitude_from_mean_motion(mean_motion_rev_per_day)?;
        Some(Self::new(
            altitude_km,
            inclination_deg,
            phase_deg,
            reference_longitude_deg,
        ))
    }

    pub fn radius_km(&self) -> f64 {
        EARTH_RADIUS_KM + self.altitude_km
    }

    /// Angular rate in radians per second.
    pub fn mean_motion_rad_s(&self) -> f64 {
        (EARTH_MU_KM3_S2 / self.radius_km().powi(3)).sqrt()
    }
}

pub fn altitude_from_mean_motion(mean_motion_rev_per_day: f64) -> Option<f64> {
    if !mean_motion_rev_per_day.is_finite() || mean_motion_rev_per_day <= 0.0 {
        return None;
    }
    let period_s = SECONDS_PER_DAY / mean_motion_rev_per_day;
    let semi_major_axis = (EARTH_MU_KM3_S2 * period_s * period_s / (4.0 * PI * PI)).cbrt();
    Some(semi_major_axis - EARTH_RADIUS_KM)
}

/// Read-only snapshot of one catalog entry for a detection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    /// Current altitude; `None` marks an entry that cannot be gated.
    pub altitude_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<OrbitDescriptor>,
}

impl TrackedObject {
    pub fn new(id: impl Into<String>, name: impl Into<String>, altitude_km: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            altitude_km: Some(altitude_km),
            orbit: None,
        }
    }

    /// Object following a circular orbit; altitude is taken from the descriptor.
    pub fn with_orbit(
        id: impl Into<String>,
        name: impl Into<String>,
        orbit: OrbitDescriptor,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            altitude_km: Some(orbit.altitude_km),
            orbit: Some(orbit),
        }
    }

    /// Altitude usable for candidate filtering.
    pub fn gate_altitude(&self) -> Option<f64> {
        self.altitude_km.filter(|altitude| altitude.is_finite())
    }
}
