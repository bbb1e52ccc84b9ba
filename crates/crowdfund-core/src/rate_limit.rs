//! Minimum-spacing throttle for outbound trail API calls.
//!
//! One grant per window: a caller arriving before the interval has elapsed
//! since the previous grant waits out the remainder. The last-grant timestamp
//! is read and updated while holding the lock, so concurrent callers are
//! granted one at a time in arrival order.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between trail API calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(5000);

/// Shared gate enforcing a minimum interval between grants.
#[derive(Debug)]
pub struct RateLimiter {
	min_interval: Duration,
	last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
	pub fn new(min_interval: Duration) -> Self {
		Self {
			min_interval,
			last_grant: Mutex::new(None),
		}
	}

	pub fn min_interval(&self) -> Duration {
		self.min_interval
	}

	/// Waits until a call is permitted and records the grant.
	pub async fn acquire(&self) {
		let mut last_grant = self.last_grant.lock().await;

		if let Some(previous) = *last_grant {
			let elapsed = previous.elapsed();
			if elapsed < self.min_interval {
				let wait = self.min_interval - elapsed;
				tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
				tokio::time::sleep(wait).await;
			}
		}

		*last_grant = Some(Instant::now());
	}
}

impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(DEFAULT_MIN_INTERVAL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	#[tokio::test(start_paused = true)]
	async fn test_first_acquire_is_immediate() {
		let limiter = RateLimiter::default();
		let start = Instant::now();
		limiter.acquire().await;
		assert_eq!(start.elapsed(), Duration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn test_back_to_back_grants_are_spaced() {
		let limiter = RateLimiter::default();

		limiter.acquire().await;
		let first = Instant::now();
		tokio::time::advance(Duration::from_millis(1200)).await;
		limiter.acquire().await;
		let second = Instant::now();

		assert!(second - first >= DEFAULT_MIN_INTERVAL);
	}

	#[tokio::test(start_paused = true)]
	async fn test_no_wait_after_idle_interval() {
		let limiter = RateLimiter::new(Duration::from_millis(100));

		limiter.acquire().await;
		tokio::time::advance(Duration::from_millis(250)).await;
		let before = Instant::now();
		limiter.acquire().await;

		assert_eq!(before.elapsed(), Duration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn test_concurrent_acquirers_are_serialized() {
		let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1)));
		let start = Instant::now();

		let handles: Vec<_> = (0..3)
			.map(|_| {
				let limiter = limiter.clone();
				tokio::spawn(async move {
					limiter.acquire().await;
					Instant::now()
				})
			})
			.collect();

		let mut grants = Vec::new();
		for handle in handles {
			grants.push(handle.await.unwrap());
		}
		grants.sort();

		assert_eq!(grants[0] - start, Duration::ZERO);
		assert!(grants[1] - grants[0] >= Duration::from_secs(1));
		assert!(grants[2] - grants[1] >= Duration::from_secs(1));
	}
}
