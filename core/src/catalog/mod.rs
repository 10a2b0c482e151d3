pub mod conjunction;
pub mod debris;
pub mod object;

pub use conjunction::{Conjunction, RiskTier};
pub use debris::{DebrisFragment, FragmentOrigin, ImpactRecord};
pub use object::{OrbitDescriptor, TrackedObject, EARTH_MU_KM3_S2, EARTH_RADIUS_KM};
