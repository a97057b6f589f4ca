use rr::{CapabilityError, RebootError};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("web interaction backend unavailable: {0}")]
	Backend(#[from] CapabilityError),

	#[error(transparent)]
	Setup(#[from] RebootError),

	#[error("router reboot failed after {attempts} attempt(s): {last}")]
	RebootFailed { attempts: usize, last: String },

	#[error("login page {url} not reachable: {reason}")]
	Unreachable { url: String, reason: String },

	#[error("interrupted")]
	Cancelled,
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
