//! Point particle on a line.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// A point mass moving along one axis.
///
/// Fields are private so the `mass > 0` invariant holds for every value that
/// exists. Deserialization goes through [`Particle::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParticleSpec")]
pub struct Particle {
    /// Mass (finite, > 0)
    mass: f64,

    /// Signed velocity in m/s
    velocity: f64,

    /// Signed position in meters
    position: f64,
}

/// Unvalidated wire form of a particle.
#[derive(Debug, Clone, Copy, Deserialize)]
struct ParticleSpec {
    mass: f64,
    velocity: f64,
    position: f64,
}

impl TryFrom<ParticleSpec> for Particle {
    type Error = SimError;

    fn try_from(spec: ParticleSpec) -> Result<Self> {
        Particle::new(spec.mass, spec.velocity, spec.position)
    }
}

impl Particle {
    /// Creates a particle after validating its invariants.
    ///
    /// # Errors
    /// * `SimError::InvalidMass` - mass is not finite or not strictly positive
    /// * `SimError::NonFinite` - velocity or position is NaN/infinite
    pub fn new(mass: f64, velocity: f64, position: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidMass(mass));
        }
        if !velocity.is_finite() {
            return Err(SimError::non_finite("velocity", velocity));
        }
        if !position.is_finite() {
            return Err(SimError::non_finite("position", position));
        }
        Ok(Self {
            mass,
            velocity,
            position,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Returns a copy with a new velocity.
    pub fn with_velocity(self, velocity: f64) -> Result<Self> {
        Self::new(self.mass, velocity, self.position)
    }

    /// Returns a copy with a new position.
    pub fn with_position(self, position: f64) -> Result<Self> {
        Self::new(self.mass, self.velocity, position)
    }

    /// Linear momentum m·v.
    #[inline]
    pub fn momentum(&self) -> f64 {
        self.mass * self.velocity
    }

    /// Kinetic energy ½·m·v².
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity * self.velocity
    }

    /// The particle moved by `velocity * dt`. Callers validate `dt`.
    ///
    /// # Errors
    /// * `SimError::NonFinite` - the new position overflowed
    #[inline]
    pub(crate) fn drifted(&self, dt: f64) -> Result<Particle> {
        self.with_position(self.position + self.velocity * dt)
    }
}
