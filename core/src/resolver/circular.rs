use crate::catalog::TrackedObject;
use crate::math::Vec3;
use crate::resolver::{OrbitalStateResolver, StateVector};

/// Analytic circular-orbit model driven by each object's [`OrbitDescriptor`].
///
/// Objects without a descriptor are unresolvable under this model.
///
/// [`OrbitDescriptor`]: crate::catalog::OrbitDescriptor
#[derive(Debug, Clone, Default)]
pub struct CircularOrbitResolver;

impl CircularOrbitResolver {
    pub fn new() -> Self {
        Self
    }
}

impl OrbitalStateResolver for CircularOrbitResolver {
    fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
        let orbit = object.orbit.as_ref()?;
        let radius = orbit.radius_km();
        if !minutes_ahead.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return None;
        }

        let rate = orbit.mean_motion_rad_s();
        let u = orbit.phase_deg.to_radians() + rate * minutes_ahead * 60.0;
        let (sin_i, cos_i) = orbit.inclination_deg.to_radians().sin_cos();
        let (sin_o, cos_o) = orbit.reference_longitude_deg.to_radians().sin_cos();

        // In-plane vector rotated by inclination about x, then by the node about z.
        let rotate = |px: f64, py: f64| {
            let y = py * cos_i;
            let z = py * sin_i;
            Vec3::new(px * cos_o - y * sin_o, px * sin_o + y * cos_o, z)
        };

        let (sin_u, cos_u) = u.sin_cos();
        let speed = radius * rate;
        let state = StateVector::new(
            rotate(radius * cos_u, radius * sin_u),
            rotate(-speed * sin_u, speed * cos_u),
        );
        state.is_finite().then_some(state)
    }
}
