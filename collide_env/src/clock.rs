//! Clock trait consumed by the driver loop.

use async_trait::async_trait;
use std::time::Duration;

/// The time source of a driver.
///
/// # Implementations
///
/// - **Production**: `TokioClock` - measures from a `tokio::time::Instant`
/// - **Simulation**: `SimContext` (in `collide_sim`) - a virtual clock
///
/// # Determinism
///
/// Under a virtual clock `sleep` advances time instantly, so a driver loop
/// produces the same `dt` sequence on every run.
#[async_trait]
pub trait FrameClock: Send + Sync + 'static {
    /// Returns the monotonic time since the clock was created.
    fn now(&self) -> Duration;

    /// Suspends until `duration` has passed on this clock.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns the clock's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64 {
        0
    }
}
