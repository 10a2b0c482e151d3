//! Conjunction screening and debris-cascade core.
//!
//! Scans a snapshot of tracked objects for close approaches over a short
//! horizon, ranks the most urgent ones, and on demand sketches the debris field
//! a collision would produce and which other objects it would threaten.

pub mod cascade;
pub mod catalog;
pub mod math;
pub mod prelude;
pub mod resolver;
pub mod screening;
pub mod telemetry;

pub use prelude::{CascadeConfig, ScreeningConfig, ScreeningError, ScreeningResult};
