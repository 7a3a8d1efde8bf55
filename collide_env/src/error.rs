//! Error types for the environment abstraction.

use thiserror::Error;

/// Errors raised by input sources.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Input event name or script entry could not be parsed
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EnvError {
    /// Creates an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
