//! Errors raised while talking to chromedriver.

use std::path::PathBuf;

use rr_protocol::error_code;

/// Driver-level failure.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
	#[error("chromedriver executable not found (tried {tried})")]
	ExecutableNotFound { tried: String },

	#[error("failed to launch chromedriver at {path}: {source}")]
	Launch {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("chromedriver did not become ready: {0}")]
	NotReady(String),

	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("webdriver error `{code}` (HTTP {status}): {message}")]
	Remote { status: u16, code: String, message: String },

	#[error("unexpected webdriver response: {0}")]
	Protocol(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl DriverError {
	/// True when the remote end reported that no element matched.
	pub fn is_no_such_element(&self) -> bool {
		self.remote_code() == Some(error_code::NO_SUCH_ELEMENT)
	}

	/// True for timeouts on either side of the wire.
	pub fn is_timeout(&self) -> bool {
		match self {
			DriverError::Transport { source, .. } => source.is_timeout(),
			other => other.remote_code() == Some(error_code::TIMEOUT),
		}
	}

	/// W3C error code when the failure came from the remote end.
	pub fn remote_code(&self) -> Option<&str> {
		match self {
			DriverError::Remote { code, .. } => Some(code.as_str()),
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, DriverError>;
