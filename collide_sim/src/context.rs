//! Virtual frame clock for deterministic driver runs.

use async_trait::async_trait;
use collide_env::FrameClock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A frame clock that moves only when the driver sleeps or a test pushes it.
///
/// Clones share the same timeline, so a test can hold one handle while the
/// driver owns another.
#[derive(Debug, Clone)]
pub struct SimContext {
    seed: u64,

    /// Nanoseconds since the run started
    now_ns: Arc<AtomicU64>,

    /// Number of `sleep` calls, i.e. frame boundaries crossed
    sleeps: Arc<AtomicU64>,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            now_ns: Arc::new(AtomicU64::new(0)),
            sleeps: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared handle, as the driver expects.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Pushes the clock forward without counting a frame. Saturates at
    /// `u64::MAX` nanoseconds (about 584 years).
    pub fn advance_time(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        // fetch_update never fails when the closure always returns Some
        let _ = self
            .now_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(by))
            });
    }

    /// Back to t = 0 with no frames counted.
    pub fn rewind(&self) {
        self.now_ns.store(0, Ordering::SeqCst);
        self.sleeps.store(0, Ordering::SeqCst);
    }

    pub fn time_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    /// How many times `sleep` has been awaited.
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameClock for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance_time(duration);
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero_and_advances() {
        let clock = SimContext::new(3);
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.seed(), 3);

        clock.advance_time(Duration::from_millis(250));
        clock.advance_time(Duration::from_millis(250));
        assert_eq!(clock.time_ns(), 500_000_000);
        assert_eq!(clock.sleep_count(), 0);

        clock.rewind();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_advance_saturates() {
        let clock = SimContext::new(0);
        clock.advance_time(Duration::MAX);
        clock.advance_time(Duration::from_secs(1));
        assert_eq!(clock.time_ns(), u64::MAX);
    }

    #[tokio::test]
    async fn test_sixty_frame_sleeps_make_one_second() {
        let clock = SimContext::new(1);
        let interval = Duration::from_nanos(16_666_667);
        for _ in 0..60 {
            clock.sleep(interval).await;
        }
        assert_eq!(clock.sleep_count(), 60);
        let secs = clock.now().as_secs_f64();
        assert!((secs - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clones_share_the_timeline() {
        let driver_side = SimContext::new(9);
        let test_side = driver_side.clone();
        test_side.advance_time(Duration::from_secs(2));
        assert_eq!(driver_side.now(), Duration::from_secs(2));
    }
}
