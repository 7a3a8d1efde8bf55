//! Wall-clock `FrameClock` for real-time playback.

use crate::FrameClock;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Frame clock backed by tokio's monotonic clock.
///
/// `now()` is measured from the moment the clock was built, so the first
/// frame of a run sees roughly zero.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// A clock whose zero is `origin` (may lie in the past).
    pub fn starting_at(origin: Instant) -> Self {
        Self { origin }
    }

    /// Arc-wrapped, as `Driver::new` takes it.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameClock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep_until(Instant::now() + duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_moves_now_forward() {
        let clock = TokioClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(5)).await;
        assert!(clock.now() >= before + Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_origin_in_the_past() {
        let origin = Instant::now() - Duration::from_secs(2);
        let clock = TokioClock::starting_at(origin);
        assert!(clock.now() >= Duration::from_secs(2));
        assert_eq!(clock.seed(), 0);
    }
}
