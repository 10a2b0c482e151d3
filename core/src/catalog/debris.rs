use crate::catalog::RiskTier;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

pub const DEBRIS_PATH_REASON: &str = "in debris field path";

/// Identities of the pair whose collision produced a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentOrigin {
    pub primary_id: String,
    pub secondary_id: String,
}

impl FragmentOrigin {
    pub fn involves(&self, object_id: &str) -> bool {
        self.primary_id == object_id || self.secondary_id == object_id
    }
}

/// One synthesized fragment. Sizes are placeholder units, not calibrated
/// ballistic properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisFragment {
    pub origin: FragmentOrigin,
    pub position: Vec3,
    pub velocity_perturbation: Vec3,
    pub size: f64,
    /// Unix seconds.
    pub created_at: f64,
}

/// Tracked object found inside the debris footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub object_id: String,
    pub object_name: String,
    pub reason: String,
    pub risk_level: RiskTier,
    pub nearest_fragment_km: f64,
}
