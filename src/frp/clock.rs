// Copyright (c) 2025 - Cowboy AI, Inc.
//! Clock abstraction for timed replay and reporting
//!
//! Replay sources sleep until absolute deadlines measured from a shared
//! evaluation origin, and the reporting layer reads the same clock to stamp
//! emissions. Going through a trait keeps both sides on one notion of time.
//!
//! `TokioClock` is the production clock. Under a paused Tokio runtime
//! (`#[tokio::test(start_paused = true)]`) it becomes a deterministic
//! virtual clock: time jumps straight to the next pending deadline.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::Instant;

/// Source of time for replay and reporting
#[async_trait]
pub trait Clock: Debug + Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Suspend until `deadline` has passed
    async fn sleep_until(&self, deadline: Instant);

    /// Time elapsed since `origin`
    fn elapsed_since(&self, origin: Instant) -> Duration {
        self.now().saturating_duration_since(origin)
    }
}

/// Clock backed by the Tokio timer wheel
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_sleeps_to_deadline() {
        let clock = TokioClock;
        let origin = clock.now();

        clock.sleep_until(origin + Duration::from_millis(250)).await;

        let elapsed = clock.elapsed_since(origin);
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(252));
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_returns_immediately() {
        let clock = TokioClock;
        let origin = clock.now();
        tokio::time::advance(Duration::from_secs(1)).await;

        clock.sleep_until(origin).await;

        assert_eq!(clock.elapsed_since(origin), Duration::from_secs(1));
    }
}
