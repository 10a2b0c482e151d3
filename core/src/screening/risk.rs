use crate::catalog::RiskTier;

pub const CRITICAL_THRESHOLD_KM: f64 = 0.1;
pub const HIGH_THRESHOLD_KM: f64 = 0.5;
pub const ELEVATED_THRESHOLD_KM: f64 = 1.0;

/// Maps a miss distance onto a [`RiskTier`]. Relative velocity does not enter
/// the tier; it travels with the conjunction for cascade sizing.
pub struct RiskClassifier;

impl RiskClassifier {
    pub fn classify(miss_distance_km: f64) -> RiskTier {
        if !miss_distance_km.is_finite() {
            RiskTier::Moderate
        } else if miss_distance_km < CRITICAL_THRESHOLD_KM {
            RiskTier::Critical
        } else if miss_distance_km < HIGH_THRESHOLD_KM {
            RiskTier::High
        } else if miss_distance_km < ELEVATED_THRESHOLD_KM {
            RiskTier::Elevated
        } else {
            RiskTier::Moderate
        }
    }

    /// Whether a tier is reported as a qualifying conjunction.
    pub fn is_reportable(tier: RiskTier) -> bool {
        tier != RiskTier::Moderate
    }
}
