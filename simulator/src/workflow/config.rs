use crate::generator::catalog::GeneratorConfig;
use crate::generator::declared::CatalogEntry;
use anyhow::Context;
use conjcore::{CascadeConfig, ScreeningConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the tracked-object snapshot comes from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    Generated(GeneratorConfig),
    Declared { objects: Vec<CatalogEntry> },
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Generated(GeneratorConfig::default())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    #[default]
    Circular,
    /// Uses the `ephemeris` tables of declared catalog entries.
    Ephemeris,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub screening: ScreeningConfig,
    pub cascade: CascadeConfig,
    pub catalog: CatalogSource,
    pub resolver: ResolverKind,
    pub cascade_seed: u64,
    pub refresh_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            screening: ScreeningConfig::default(),
            cascade: CascadeConfig::default(),
            catalog: CatalogSource::default(),
            resolver: ResolverKind::Circular,
            cascade_seed: 0,
            refresh_secs: 5,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.screening.validate().context("screening section")?;
        self.cascade.validate().context("cascade section")?;
        Ok(())
    }

    pub fn from_args(objects: usize, seed: u64, steps: usize, workers: usize) -> Self {
        Self {
            screening: ScreeningConfig {
                steps,
                workers,
                ..Default::default()
            },
            catalog: CatalogSource::Generated(GeneratorConfig {
                objects,
                seed,
                ..Default::default()
            }),
            cascade_seed: seed,
            ..Default::default()
        }
    }

    pub fn to_screening_config(&self) -> ScreeningConfig {
        self.screening.clone()
    }
}
