use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pairs whose altitudes differ by more than this never reach full evaluation.
pub const ALTITUDE_GATE_KM: f64 = 100.0;
/// Miss distance below which a sampled approach becomes a conjunction.
pub const HIGH_RISK_THRESHOLD_KM: f64 = 1.0;
pub const DEFAULT_HORIZON_MINUTES: f64 = 30.0;
pub const DEFAULT_STEPS: usize = 30;
/// Upper bound on sampling intervals per horizon.
pub const MAX_STEPS: usize = 100_000;
pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Radius around each fragment inside which a tracked object is threatened.
pub const IMPACT_RADIUS_KM: f64 = 100.0;
/// Ceiling on fragments synthesized for a single conjunction.
pub const MAX_FRAGMENTS: usize = 10_000;

/// Shared configuration for one detection cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreeningConfig {
    pub horizon_minutes: f64,
    /// Number of sampling intervals across the horizon. More steps shrink the
    /// gap in which a true minimum can hide between samples, at linear cost.
    pub steps: usize,
    pub altitude_gate_km: f64,
    pub detection_threshold_km: f64,
    pub max_results: usize,
    pub workers: usize,
    /// Wall-clock budget for a cycle; `None` runs to completion.
    pub budget_ms: Option<u64>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
            steps: DEFAULT_STEPS,
            altitude_gate_km: ALTITUDE_GATE_KM,
            detection_threshold_km: HIGH_RISK_THRESHOLD_KM,
            max_results: DEFAULT_MAX_RESULTS,
            workers: 1,
            budget_ms: None,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> ScreeningResult<()> {
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(ScreeningError::InvalidConfig(format!(
                "steps must lie in 1..={}, got {}",
                MAX_STEPS, self.steps
            )));
        }
        if self.max_results == 0 {
            return Err(ScreeningError::InvalidConfig(
                "max_results must be at least 1".into(),
            ));
        }
        if !self.horizon_minutes.is_finite() || self.horizon_minutes <= 0.0 {
            return Err(ScreeningError::InvalidConfig(format!(
                "horizon must be positive, got {}",
                self.horizon_minutes
            )));
        }
        if !self.altitude_gate_km.is_finite() || self.altitude_gate_km < 0.0 {
            return Err(ScreeningError::InvalidConfig(format!(
                "altitude gate must be non-negative, got {}",
                self.altitude_gate_km
            )));
        }
        if !(self.detection_threshold_km > 0.0
            && self.detection_threshold_km <= HIGH_RISK_THRESHOLD_KM)
        {
            return Err(ScreeningError::InvalidConfig(format!(
                "detection threshold must lie in (0, {}] km, got {}",
                HIGH_RISK_THRESHOLD_KM, self.detection_threshold_km
            )));
        }
        if self.workers == 0 {
            return Err(ScreeningError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        }
        Ok(())
    }

    /// Time offset in minutes of sample `k`.
    pub fn sample_minutes(&self, k: usize) -> f64 {
        k as f64 * self.horizon_minutes / self.steps as f64
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget_ms.map(Duration::from_millis)
    }
}

/// Parameters of the illustrative debris model and its impact footprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CascadeConfig {
    pub base_fragments: f64,
    pub fragments_per_km_s: f64,
    /// Full width of the per-axis perturbation as a fraction of relative velocity.
    pub spread_factor: f64,
    pub max_fragment_size: f64,
    pub impact_radius_km: f64,
    /// Fragment counts above this are clamped.
    pub max_fragments: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            base_fragments: 50.0,
            fragments_per_km_s: 10.0,
            spread_factor: 0.3,
            max_fragment_size: 0.5,
            impact_radius_km: IMPACT_RADIUS_KM,
            max_fragments: MAX_FRAGMENTS,
        }
    }
}

impl CascadeConfig {
    pub fn validate(&self) -> ScreeningResult<()> {
        let coefficients = [
            ("base_fragments", self.base_fragments),
            ("fragments_per_km_s", self.fragments_per_km_s),
            ("spread_factor", self.spread_factor),
            ("max_fragment_size", self.max_fragment_size),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(ScreeningError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.impact_radius_km.is_finite() || self.impact_radius_km <= 0.0 {
            return Err(ScreeningError::InvalidConfig(format!(
                "impact radius must be positive, got {}",
                self.impact_radius_km
            )));
        }
        if self.max_fragments == 0 || self.max_fragments > MAX_FRAGMENTS {
            return Err(ScreeningError::InvalidConfig(format!(
                "max_fragments must lie in 1..={}, got {}",
                MAX_FRAGMENTS, self.max_fragments
            )));
        }
        Ok(())
    }
}

/// Common error type for the screening core.
#[derive(thiserror::Error, Debug)]
pub enum ScreeningError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("a detection cycle is already in progress")]
    CycleInProgress,
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type ScreeningResult<T> = Result<T, ScreeningError>;
