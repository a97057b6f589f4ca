//! Cancellable suspension points.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{CapabilityError, Result};

/// Sleeps for `duration` unless `cancel` fires first. Returns `false` when cancelled.
pub async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
	if cancel.is_cancelled() {
		return false;
	}
	if duration.is_zero() {
		return true;
	}
	tokio::select! {
		biased;
		_ = cancel.cancelled() => false,
		_ = tokio::time::sleep(duration) => true,
	}
}

/// Runs `fut` to completion unless `cancel` fires first.
pub async fn or_cancel<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(CapabilityError::Cancelled),
		result = fut => result,
	}
}
