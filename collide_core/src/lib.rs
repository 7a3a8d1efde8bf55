//! Collide Core - One-Dimensional Perfectly Inelastic Collision Engine
//!
//! A small deterministic state machine for two point masses on a line:
//! 1. **Integrator**: constant-velocity drift, `x += v·dt`
//! 2. **Detector**: fires once the left body reaches the right body
//! 3. **Resolver**: momentum-conserving merge into a single body
//! 4. **Lifecycle**: `Configured` → `Collided`, with reset back to the snapshot
//!
//! The engine never samples a clock. Callers inject `dt`, and a given
//! configuration plus `dt` sequence always yields the same trajectory.

pub mod error;
pub mod particle;
pub mod integrator;
pub mod detector;
pub mod resolver;
pub mod simulation;

// Re-export key types for convenience
pub use error::{Result, SimError};
pub use particle::Particle;
pub use integrator::advance;
pub use detector::{detect, Contact};
pub use resolver::{resolve, Merger};
pub use simulation::{BodyState, CollisionReport, Phase, Simulation};

/// Builds an initial pair from a dynamically sized sequence.
///
/// # Errors
/// `SimError::ParticleCount` unless exactly two particles are given.
pub fn pair_from_slice(particles: &[Particle]) -> Result<[Particle; 2]> {
    match particles {
        [left, right] => Ok([*left, *right]),
        other => Err(SimError::ParticleCount(other.len())),
    }
}
