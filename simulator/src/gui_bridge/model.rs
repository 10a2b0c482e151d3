use conjcore::cascade::CascadeReport;
use conjcore::screening::CycleReport;
use serde::{Deserialize, Serialize};

/// Latest screening state as served to presentation clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub catalog_size: usize,
    pub report: Option<CycleReport>,
    pub cascade: Option<CascadeReport>,
    pub status: Option<String>,
}

/// Body of a `POST /cascade` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeRequest {
    pub index: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}
