pub mod cache;
pub mod cycle;
pub mod filter;
pub mod registry;
pub mod risk;
pub mod scheduler;
pub mod search;

pub use cache::TrajectoryCache;
pub use cycle::{CycleReport, CycleStatus, DetectionCycle};
pub use filter::{CandidateFilter, CandidateSet};
pub use registry::ConjunctionRegistry;
pub use risk::RiskClassifier;
pub use scheduler::DetectionLoop;
pub use search::{ClosestApproach, ClosestApproachSearch, SearchOutcome};
