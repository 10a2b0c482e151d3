//! Orbital-state resolution.
//!
//! The screening core never propagates orbits itself; it asks an
//! [`OrbitalStateResolver`] for an object's state at "epoch + minutes". Two
//! implementations ship with the crate and [`StateResolver`] picks one when the
//! caller builds it, so no call site has to inspect what kind of orbit an
//! object carries.

pub mod circular;
pub mod ephemeris;

pub use circular::CircularOrbitResolver;
pub use ephemeris::{Ephemeris, EphemerisResolver};

use crate::catalog::TrackedObject;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Position (km) and velocity (km/s) in the common inertial frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl StateVector {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Capability returning an object's state at a time offset from the cycle
/// epoch. `None` means the state is unresolvable for that instant, which the
/// core treats as a skipped sample rather than an error.
pub trait OrbitalStateResolver {
    fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector>;
}

impl<R: OrbitalStateResolver + ?Sized> OrbitalStateResolver for &R {
    fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
        (**self).resolve(object, minutes_ahead)
    }
}

/// Resolver selected at construction time.
#[derive(Debug, Clone)]
pub enum StateResolver {
    Circular(CircularOrbitResolver),
    Ephemeris(EphemerisResolver),
}

impl StateResolver {
    pub fn circular() -> Self {
        StateResolver::Circular(CircularOrbitResolver::new())
    }

    pub fn ephemeris(resolver: EphemerisResolver) -> Self {
        StateResolver::Ephemeris(resolver)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StateResolver::Circular(_) => "circular",
            StateResolver::Ephemeris(_) => "ephemeris",
        }
    }
}

impl OrbitalStateResolver for StateResolver {
    fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
        match self {
            StateResolver::Circular(resolver) => resolver.resolve(object, minutes_ahead),
            StateResolver::Ephemeris(resolver) => resolver.resolve(object, minutes_ahead),
        }
    }
}
