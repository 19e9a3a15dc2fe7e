//! Bounded wait primitives
//!
//! The engine never sleeps for a fixed duration; every delay is a condition
//! wait with a caller-specified timeout.

use std::future::Future;
use std::time::{Duration, Instant};

/// Poll `probe` until it returns true or `timeout` elapses.
///
/// Returns whether the condition was met. The probe runs at least once even
/// with a zero timeout.
pub async fn wait_until<F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    loop {
        if probe().await {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}
