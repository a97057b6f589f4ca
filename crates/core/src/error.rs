//! Error types for the capability layer and the orchestrator.

use std::time::Duration;

/// Failure reported by a [`WebInteraction`](crate::WebInteraction) backend.
///
/// Components never let these escape: they log them and collapse the
/// outcome to `false`.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
	#[error("session setup failed: {0}")]
	Setup(String),

	#[error("element {locator} not found within {timeout:?}")]
	ElementNotFound { locator: String, timeout: Duration },

	#[error("navigation to {url} failed: {message}")]
	Navigation { url: String, message: String },

	#[error("{operation} timed out after {elapsed:?}")]
	Timeout { operation: &'static str, elapsed: Duration },

	#[error("session already released")]
	Closed,

	#[error("operation cancelled")]
	Cancelled,

	#[error("{0}")]
	Backend(String),
}

impl CapabilityError {
	/// First line of the message; browser errors tend to append stack traces.
	pub fn summary(&self) -> String {
		let message = self.to_string();
		message.lines().next().unwrap_or_default().to_string()
	}
}

/// Fatal orchestration failure. Recoverable failures are reported through
/// [`RebootReport`](crate::RebootReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum RebootError {
	#[error("web interaction backend unavailable: {0}")]
	Setup(#[source] CapabilityError),
}

pub type Result<T, E = CapabilityError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn summary_keeps_first_line_only() {
		let err = CapabilityError::Navigation {
			url: "http://192.168.11.1/login.html".into(),
			message: "unknown error: net::ERR_CONNECTION_REFUSED\n  (Session info: chrome=126.0)\nStacktrace:".into(),
		};
		assert_eq!(
			err.summary(),
			"navigation to http://192.168.11.1/login.html failed: unknown error: net::ERR_CONNECTION_REFUSED"
		);
	}

	#[test]
	fn element_not_found_mentions_locator_and_timeout() {
		let err = CapabilityError::ElementNotFound {
			locator: "name=airstation_uname".into(),
			timeout: Duration::from_secs(20),
		};
		assert_eq!(err.to_string(), "element name=airstation_uname not found within 20s");
	}
}
