pub mod stats;
pub mod vector;

pub use stats::StatsHelper;
pub use vector::Vec3;
