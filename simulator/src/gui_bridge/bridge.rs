use crate::generator::catalog::GeneratorConfig;
use crate::gui_bridge::model::{CascadeRequest, VisualizationModel};
use crate::workflow::runner::{now_epoch, Runner};
use anyhow::{Context, Result};
use conjcore::cascade::CascadeReport;
use conjcore::catalog::TrackedObject;
use conjcore::screening::CycleReport;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

#[derive(Default)]
struct BridgeState {
    model: VisualizationModel,
    catalog: Vec<TrackedObject>,
}

type SharedState = Arc<RwLock<BridgeState>>;

// Readers and writers only swap whole values, so a poisoned lock still holds
// a consistent snapshot.
fn read(state: &SharedState) -> RwLockReadGuard<'_, BridgeState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(state: &SharedState) -> RwLockWriteGuard<'_, BridgeState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs `work` on tokio's blocking pool so handlers never stall the bridge
/// runtime while a detection cycle holds the runner.
async fn off_runtime<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("joining bridge worker")?
}

fn run_cascade(
    state: &SharedState,
    runner: &Runner,
    request: &CascadeRequest,
) -> Result<CascadeReport> {
    let (report, catalog) = {
        let guard = read(state);
        let report = guard
            .model
            .report
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no screening report published yet"))?;
        (report, guard.catalog.clone())
    };
    let seed = request.seed.unwrap_or(runner.config().cascade_seed);
    let cascade = runner.cascade(&report, request.index, &catalog, seed)?;
    write(state).model.cascade = Some(cascade.clone());
    Ok(cascade)
}

fn ingest_generator(
    state: &SharedState,
    runner: &Runner,
    config: &GeneratorConfig,
) -> Result<CycleReport> {
    let catalog = runner.generate_catalog(config)?;
    let report = runner.screen(&catalog, now_epoch()?)?;
    let mut guard = write(state);
    guard.model = VisualizationModel {
        catalog_size: catalog.len(),
        report: Some(report.clone()),
        cascade: None,
        status: config.description.clone(),
    };
    guard.catalog = catalog;
    Ok(report)
}

/// Bridge that hosts the report HTTP endpoint for presentation clients.
pub struct GuiBridge {
    state: SharedState,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeState::default())),
            runner,
        }
    }

    /// Starts the HTTP endpoint on a background thread.
    pub fn serve(&self, address: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("conjunctions")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedState| warp::reply::json(&read(&state).model));

        let cascade_route = warp::path("cascade")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |request: CascadeRequest, state: SharedState, runner: Arc<Runner>| async move {
                    let cascade =
                        off_runtime(move || run_cascade(&state, &runner, &request)).await;
                    match cascade {
                        Ok(cascade) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                            warp::reply::json(&cascade),
                            StatusCode::OK,
                        )),
                        Err(err) => {
                            log::warn!("cascade error: {:#}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig, state: SharedState, runner: Arc<Runner>| async move {
                    let request = config.clone();
                    let ingested =
                        off_runtime(move || ingest_generator(&state, &runner, &request)).await;
                    match ingested {
                        Ok(report) => {
                            if let Some(name) = config.scenario.as_ref() {
                                log::info!(
                                    "[GUI] Scenario {} -> conjunctions {}",
                                    name,
                                    report.conjunctions.len()
                                );
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "conjunctions": report.conjunctions.len(),
                                    "partial": report.is_partial(),
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            log::warn!("ingest-config error: {:#}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(cascade_route).or(generator_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });
    }

    pub fn set_catalog(&self, catalog: Vec<TrackedObject>) {
        let mut guard = write(&self.state);
        guard.model.catalog_size = catalog.len();
        guard.catalog = catalog;
    }

    pub fn catalog(&self) -> Vec<TrackedObject> {
        read(&self.state).catalog.clone()
    }

    pub fn publish(&self, report: &CycleReport) -> Result<()> {
        let mut guard = write(&self.state);
        guard.model.report = Some(report.clone());
        guard.model.cascade = None;
        log::info!(
            "[GUI] conjunctions: {}, status: {:?}, catalog: {}",
            report.conjunctions.len(),
            report.status,
            guard.model.catalog_size
        );
        Ok(())
    }

    pub fn publish_cascade(&self, cascade: &CascadeReport) {
        write(&self.state).model.cascade = Some(cascade.clone());
    }

    pub fn publish_status(&self, message: &str) {
        write(&self.state).model.status = Some(message.to_string());
        log::info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn cascade(&self, request: &CascadeRequest) -> Result<CascadeReport> {
        run_cascade(&self.state, &self.runner, request)
    }

    #[cfg(test)]
    pub fn ingest(&self, config: &GeneratorConfig) -> Result<CycleReport> {
        ingest_generator(&self.state, &self.runner, config)
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        read(&self.state).model.clone()
    }
}
