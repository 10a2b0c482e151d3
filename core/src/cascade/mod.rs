//! On-demand debris-cascade sketch for a single selected conjunction.
//!
//! The fragment model is a coarse illustration sized by closing speed. It is
//! not a calibrated breakup model and its output should not be read as a
//! ballistic prediction.

pub mod fragments;
pub mod impact;
pub mod report;

pub use fragments::DebrisCascadeSimulator;
pub use impact::ImpactAssessor;
pub use report::{CascadeReport, CascadeSummary};
