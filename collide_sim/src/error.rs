//! Error type for the driver harness.

use collide_core::SimError;
use collide_env::EnvError;
use thiserror::Error;

/// Errors surfaced by the driver, runner, and CLI.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The engine rejected a call
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// Input script or clock failure
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// Invalid driver or scenario configuration
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Creates a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
