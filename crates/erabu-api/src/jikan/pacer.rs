//! Request pacing for the Jikan API.
//!
//! Jikan is a free public API and must not see more than one request
//! per second from a single client.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Serializes callers so that consecutive grants are at least a fixed
/// interval apart.
///
/// The lock is held across the wait, so a second concurrent caller
/// waits relative to the first caller's grant timestamp rather than
/// its own arrival time. `acquire` never fails; the delay is a timed
/// suspension of the calling task only.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Suspend until at least `min_interval` has elapsed since the
    /// previous grant, then record the new grant time.
    pub async fn acquire(&self) {
        let mut last = self.last_grant.lock().await;

        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            if Instant::now() < ready_at {
                tracing::trace!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "pacing request"
                );
                sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn back_to_back_grants_are_spaced() {
        let pacer = RequestPacer::new(Duration::from_millis(1000));

        let start = Instant::now();
        pacer.acquire().await;
        pacer.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn first_grant_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(1000));

        let start = Instant::now();
        pacer.acquire().await;

        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_serialized() {
        use std::sync::Arc;

        let pacer = Arc::new(RequestPacer::new(Duration::from_millis(1000)));
        let start = Instant::now();

        let a = tokio::spawn({
            let pacer = pacer.clone();
            async move {
                pacer.acquire().await;
                start.elapsed()
            }
        });
        let b = tokio::spawn({
            let pacer = pacer.clone();
            async move {
                pacer.acquire().await;
                start.elapsed()
            }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let (first, second) = if a < b { (a, b) } else { (b, a) };

        assert!(first < Duration::from_millis(1000));
        // Second caller waits for the first's grant timestamp.
        assert!(second >= Duration::from_millis(1000));
    }
}
