//! Retry, recovery and timing knobs.

use std::time::Duration;

/// Outer attempt loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total attempts, at least one is always made.
	pub max_attempts: u32,
	/// Pause between a failed attempt and the next one.
	pub backoff: Duration,
}

impl RetryPolicy {
	pub fn new(max_attempts: u32, backoff: Duration) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			backoff,
		}
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(3, Duration::from_secs(30))
	}
}

/// Post-reboot polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryPolicy {
	/// Unconditional wait before the first probe; the device is still shutting down.
	pub initial_grace: Duration,
	/// Polling budget, measured from the end of the grace period.
	pub max_wait: Duration,
	pub poll_interval: Duration,
	/// Page-load bound for one probe, far shorter than a normal navigation.
	pub probe_timeout: Duration,
}

impl Default for RecoveryPolicy {
	fn default() -> Self {
		Self {
			initial_grace: Duration::from_secs(20),
			max_wait: Duration::from_secs(300),
			poll_interval: Duration::from_secs(10),
			probe_timeout: Duration::from_secs(10),
		}
	}
}

/// Bounded waits and settle delays for login and trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
	pub element_timeout: Duration,
	pub page_load_timeout: Duration,
	/// Time for the post-submit redirect to complete.
	pub login_settle: Duration,
	/// Time for a confirmation dialog to resolve after the reboot click.
	pub trigger_settle: Duration,
}

impl Default for Timings {
	fn default() -> Self {
		Self {
			element_timeout: Duration::from_secs(20),
			page_load_timeout: Duration::from_secs(30),
			login_settle: Duration::from_secs(3),
			trigger_settle: Duration::from_secs(2),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn retry_policy_always_allows_one_attempt() {
		assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
		assert_eq!(RetryPolicy::new(5, Duration::ZERO).max_attempts, 5);
	}
}
