//! Error types for the collision engine.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Contract violations rejected at the engine boundary.
///
/// Every variant is raised by the call that received the bad input; the
/// simulation state is left exactly as it was before that call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Particle mass was zero, negative, or not finite.
    #[error("Invalid mass: {0} (must be finite and > 0)")]
    InvalidMass(f64),

    /// A velocity or position component was NaN or infinite.
    #[error("Non-finite {field}: {value}")]
    NonFinite {
        field: &'static str,
        value: f64,
    },

    /// Time step was negative or not finite.
    #[error("Invalid time step: {0} (must be finite and >= 0)")]
    InvalidTimeStep(f64),

    /// An initial configuration did not contain exactly two particles.
    #[error("Expected exactly 2 particles, got {0}")]
    ParticleCount(usize),
}

impl SimError {
    /// Creates a non-finite field error.
    pub fn non_finite(field: &'static str, value: f64) -> Self {
        Self::NonFinite { field, value }
    }
}
