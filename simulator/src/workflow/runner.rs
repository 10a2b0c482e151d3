use crate::generator::catalog::{build_catalog_from_config, GeneratorConfig};
use crate::generator::declared::{build_declared_catalog, build_ephemeris_resolver};
use crate::workflow::config::{CatalogSource, ResolverKind, WorkflowConfig};
use anyhow::Context;
use conjcore::cascade::CascadeReport;
use conjcore::catalog::TrackedObject;
use conjcore::resolver::StateResolver;
use conjcore::screening::{CycleReport, DetectionCycle, DetectionLoop};
use conjcore::telemetry::ScreeningMetrics;
use conjcore::ScreeningError;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of a refresh tick.
pub enum TickOutcome {
    Screened(CycleReport),
    /// The previous cycle had not returned yet.
    Skipped,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    detection: Arc<DetectionLoop<StateResolver>>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let resolver = match (&config.resolver, &config.catalog) {
            (ResolverKind::Circular, _) => StateResolver::circular(),
            (ResolverKind::Ephemeris, CatalogSource::Declared { objects }) => {
                StateResolver::ephemeris(build_ephemeris_resolver(objects))
            }
            (ResolverKind::Ephemeris, CatalogSource::Generated(_)) => {
                anyhow::bail!("the ephemeris resolver needs a declared catalog with tables")
            }
        };
        let cycle = DetectionCycle::new(config.to_screening_config(), resolver)
            .context("building detection cycle")?;
        log::info!(
            "runner ready: {} resolver, horizon {} min in {} steps, {} worker(s)",
            cycle.resolver().kind(),
            cycle.config().horizon_minutes,
            cycle.config().steps,
            cycle.config().workers
        );

        Ok(Self {
            config,
            detection: Arc::new(DetectionLoop::new(cycle)),
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn build_catalog(&self) -> anyhow::Result<Vec<TrackedObject>> {
        match &self.config.catalog {
            CatalogSource::Generated(generator) => {
                build_catalog_from_config(generator).context("generating synthetic catalog")
            }
            CatalogSource::Declared { objects } => Ok(build_declared_catalog(objects)),
        }
    }

    /// Catalog from an ad-hoc generator config; only the circular resolver can
    /// place generated objects.
    pub fn generate_catalog(
        &self,
        generator: &GeneratorConfig,
    ) -> anyhow::Result<Vec<TrackedObject>> {
        if self.config.resolver != ResolverKind::Circular {
            anyhow::bail!("generated catalogs require the circular resolver");
        }
        build_catalog_from_config(generator).context("generating synthetic catalog")
    }

    /// Runs a cycle, waiting for any cycle already in flight.
    pub fn screen(&self, catalog: &[TrackedObject], epoch: f64) -> anyhow::Result<CycleReport> {
        self.detection
            .run_cycle(catalog, epoch)
            .context("running detection cycle")
    }

    /// Runs a cycle unless one is still in flight.
    pub fn tick(&self, catalog: &[TrackedObject], epoch: f64) -> anyhow::Result<TickOutcome> {
        match self.detection.try_run_cycle(catalog, epoch) {
            Ok(report) => Ok(TickOutcome::Screened(report)),
            Err(ScreeningError::CycleInProgress) => Ok(TickOutcome::Skipped),
            Err(err) => Err(err).context("running detection cycle"),
        }
    }

    pub fn cascade(
        &self,
        report: &CycleReport,
        index: usize,
        catalog: &[TrackedObject],
        seed: u64,
    ) -> anyhow::Result<CascadeReport> {
        let conjunction = report.conjunction(index).with_context(|| {
            format!(
                "conjunction {} not in report ({} available)",
                index,
                report.conjunctions.len()
            )
        })?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(CascadeReport::build(
            conjunction,
            catalog,
            self.detection.cycle().resolver(),
            &self.config.cascade,
            &mut rng,
            report.epoch,
        ))
    }

    pub fn metrics(&self) -> ScreeningMetrics {
        self.detection.metrics().snapshot()
    }
}

pub fn now_epoch() -> anyhow::Result<f64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?;
    Ok(elapsed.as_secs_f64())
}
