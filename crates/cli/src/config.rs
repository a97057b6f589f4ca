//! YAML configuration.
//!
//! The file is deserialized into loose `Raw*` structs and then validated into
//! the typed values the orchestrator takes. Nothing here is retried: a bad
//! configuration ends the run before a browser is started.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rr::{Credentials, DriverConfig, FormLocators, Locator, LocatorParseError, RecoveryPolicy, RetryPolicy, RouterEndpoint, Timings};
use serde::Deserialize;
use url::Url;

/// Where the configuration lives inside the container image.
pub const DEFAULT_CONFIG_PATH: &str = "/app/config/config.yml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {origin}: {source}")]
	Parse {
		origin: String,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("invalid router.connection.base_url {value:?}: {reason}")]
	BaseUrl { value: String, reason: String },

	#[error("router.endpoints.{key} must be a path relative to base_url, got {value:?}")]
	Endpoint { key: &'static str, value: String },

	#[error("{key} must not be empty")]
	Empty { key: &'static str },

	#[error("router.options.retry_count must be at least 1")]
	RetryCount,

	#[error("{key} must be greater than zero")]
	ZeroDuration { key: &'static str },

	#[error("invalid router.selectors.{key}: {source}")]
	Selector {
		key: &'static str,
		#[source]
		source: LocatorParseError,
	},
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, Deserialize)]
struct RawConfig {
	router: RawRouter,
	#[serde(default)]
	browser: RawBrowser,
}

#[derive(Debug, Deserialize)]
struct RawRouter {
	connection: RawConnection,
	endpoints: RawEndpoints,
	auth: RawAuth,
	#[serde(default)]
	options: RawOptions,
	#[serde(default)]
	recovery: RawRecovery,
	#[serde(default)]
	selectors: RawSelectors,
}

#[derive(Debug, Deserialize)]
struct RawConnection {
	base_url: String,
	#[serde(default = "default_timeout_seconds")]
	timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct RawEndpoints {
	login: String,
	reboot: String,
}

#[derive(Deserialize)]
struct RawAuth {
	username: String,
	password: String,
}

impl fmt::Debug for RawAuth {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RawAuth").field("username", &self.username).finish_non_exhaustive()
	}
}

#[derive(Debug, Deserialize)]
struct RawOptions {
	#[serde(default = "default_retry_count")]
	retry_count: u32,
	#[serde(default = "default_retry_interval_seconds")]
	retry_interval_seconds: u64,
}

impl Default for RawOptions {
	fn default() -> Self {
		Self {
			retry_count: default_retry_count(),
			retry_interval_seconds: default_retry_interval_seconds(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct RawRecovery {
	initial_grace_seconds: Option<u64>,
	max_wait_seconds: Option<u64>,
	poll_interval_seconds: Option<u64>,
	probe_timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSelectors {
	username: Option<String>,
	password: Option<String>,
	login_submit: Option<String>,
	reboot_confirm: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBrowser {
	chromedriver_path: Option<PathBuf>,
	chrome_binary: Option<PathBuf>,
	args: Option<Vec<String>>,
}

fn default_timeout_seconds() -> u64 {
	30
}

fn default_retry_count() -> u32 {
	3
}

fn default_retry_interval_seconds() -> u64 {
	30
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
	pub endpoint: RouterEndpoint,
	pub credentials: Credentials,
	pub retry: RetryPolicy,
	pub recovery: RecoveryPolicy,
	pub locators: FormLocators,
	pub timings: Timings,
	pub driver: DriverConfig,
}

impl AppConfig {
	/// Reads and validates `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&raw, &path.display().to_string())
	}

	/// Validates configuration held in memory.
	pub fn from_yaml(yaml: &str) -> Result<Self> {
		Self::parse(yaml, "<inline>")
	}

	fn parse(yaml: &str, origin: &str) -> Result<Self> {
		let raw: RawConfig = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
			origin: origin.to_string(),
			source,
		})?;
		Self::validate(raw)
	}

	fn validate(raw: RawConfig) -> Result<Self> {
		let RawConfig { router, browser } = raw;

		let base_url = validate_base_url(&router.connection.base_url)?;
		let login = validate_endpoint("login", &router.endpoints.login)?;
		let reboot = validate_endpoint("reboot", &router.endpoints.reboot)?;
		let endpoint = RouterEndpoint::new(base_url, login, reboot);

		if router.auth.username.trim().is_empty() {
			return Err(ConfigError::Empty { key: "router.auth.username" });
		}
		let credentials = Credentials::new(router.auth.username, router.auth.password);

		if router.options.retry_count == 0 {
			return Err(ConfigError::RetryCount);
		}
		let retry = RetryPolicy::new(router.options.retry_count, Duration::from_secs(router.options.retry_interval_seconds));

		let defaults = RecoveryPolicy::default();
		let recovery = RecoveryPolicy {
			initial_grace: seconds_or(router.recovery.initial_grace_seconds, defaults.initial_grace),
			max_wait: nonzero("router.recovery.max_wait_seconds", router.recovery.max_wait_seconds, defaults.max_wait)?,
			poll_interval: nonzero("router.recovery.poll_interval_seconds", router.recovery.poll_interval_seconds, defaults.poll_interval)?,
			probe_timeout: nonzero("router.recovery.probe_timeout_seconds", router.recovery.probe_timeout_seconds, defaults.probe_timeout)?,
		};

		let defaults = FormLocators::default();
		let selectors = router.selectors;
		let locators = FormLocators {
			username: locator_or("username", selectors.username, defaults.username)?,
			password: locator_or("password", selectors.password, defaults.password)?,
			login_submit: locator_or("login_submit", selectors.login_submit, defaults.login_submit)?,
			reboot_confirm: locator_or("reboot_confirm", selectors.reboot_confirm, defaults.reboot_confirm)?,
		};

		let timings = Timings {
			page_load_timeout: nonzero(
				"router.connection.timeout_seconds",
				Some(router.connection.timeout_seconds),
				Timings::default().page_load_timeout,
			)?,
			..Timings::default()
		};

		let mut driver = DriverConfig {
			executable: browser.chromedriver_path,
			chrome_binary: browser.chrome_binary,
			..DriverConfig::default()
		};
		if let Some(args) = browser.args {
			driver.chrome_args = args;
		}

		Ok(Self {
			endpoint,
			credentials,
			retry,
			recovery,
			locators,
			timings,
			driver,
		})
	}

	/// Human-readable summary with the password redacted.
	pub fn describe(&self) -> String {
		let mut out = String::new();
		let lines = [
			format!("router:        {}", self.endpoint.base_url()),
			format!("login page:    {}", self.endpoint.login_url()),
			format!("reboot page:   {}", self.endpoint.reboot_url()),
			format!("username:      {}", self.credentials.username()),
			"password:      <redacted>".to_string(),
			format!(
				"attempts:      {} (backoff {}s)",
				self.retry.max_attempts,
				self.retry.backoff.as_secs()
			),
			format!(
				"recovery:      grace {}s, max wait {}s, poll every {}s, probe timeout {}s",
				self.recovery.initial_grace.as_secs(),
				self.recovery.max_wait.as_secs(),
				self.recovery.poll_interval.as_secs(),
				self.recovery.probe_timeout.as_secs()
			),
			format!(
				"selectors:     username {}, password {}, submit {}, reboot {}",
				self.locators.username, self.locators.password, self.locators.login_submit, self.locators.reboot_confirm
			),
			format!("page load:     {}s", self.timings.page_load_timeout.as_secs()),
		];
		for line in lines {
			out.push_str(&line);
			out.push('\n');
		}
		out
	}
}

fn validate_base_url(value: &str) -> Result<String> {
	let invalid = |reason: String| ConfigError::BaseUrl {
		value: value.to_string(),
		reason,
	};
	let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
	}
	if url.host_str().is_none_or(str::is_empty) {
		return Err(invalid("missing host".to_string()));
	}
	Ok(value.trim().to_string())
}

fn validate_endpoint(key: &'static str, value: &str) -> Result<String> {
	let value = value.trim();
	if value.trim_matches('/').is_empty() || Url::parse(value).is_ok() {
		return Err(ConfigError::Endpoint {
			key,
			value: value.to_string(),
		});
	}
	Ok(value.to_string())
}

fn seconds_or(value: Option<u64>, default: Duration) -> Duration {
	value.map(Duration::from_secs).unwrap_or(default)
}

fn nonzero(key: &'static str, value: Option<u64>, default: Duration) -> Result<Duration> {
	let duration = seconds_or(value, default);
	if duration.is_zero() {
		return Err(ConfigError::ZeroDuration { key });
	}
	Ok(duration)
}

fn locator_or(key: &'static str, value: Option<String>, default: Locator) -> Result<Locator> {
	match value {
		Some(raw) => raw.parse().map_err(|source| ConfigError::Selector { key, source }),
		None => Ok(default),
	}
}
