use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Discrete urgency tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Moderate,
    Elevated,
    High,
    Critical,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Moderate => "MODERATE",
            RiskTier::Elevated => "ELEVATED",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Predicted close approach between two tracked objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conjunction {
    pub primary_id: String,
    pub primary_name: String,
    pub secondary_id: String,
    pub secondary_name: String,
    pub miss_distance_km: f64,
    pub relative_velocity_km_s: f64,
    pub time_to_closest_approach_min: f64,
    /// Unix seconds of the predicted closest approach.
    pub timestamp: f64,
    pub risk_tier: RiskTier,
    /// Primary object's position at the closest sample.
    pub collision_point: Vec3,
}

impl Conjunction {
    pub fn involves(&self, object_id: &str) -> bool {
        self.primary_id == object_id || self.secondary_id == object_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_by_severity() {
        assert!(RiskTier::Critical > RiskTier::High);
        assert!(RiskTier::High > RiskTier::Elevated);
        assert!(RiskTier::Elevated > RiskTier::Moderate);
    }

    #[test]
    fn tier_serializes_as_upper_case_label() {
        let json = serde_json::to_string(&RiskTier::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        assert_eq!(RiskTier::Elevated.to_string(), "ELEVATED");
    }
}
