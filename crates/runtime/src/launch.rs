//! chromedriver and Chrome launch settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rr_protocol::ChromeOptions;

use crate::error::{DriverError, Result};

/// Environment variable that overrides the chromedriver location.
pub const CHROMEDRIVER_PATH_ENV: &str = "CHROMEDRIVER_PATH";

/// Location used when neither config, environment nor `PATH` provide one.
pub const FALLBACK_CHROMEDRIVER_PATH: &str = "/usr/bin/chromedriver";

/// Flags for a headless Chrome inside a container.
///
/// No user-data or cache directory is passed: chromedriver gives every
/// session a throwaway profile, which keeps sessions isolated.
pub fn default_chrome_args() -> Vec<String> {
	[
		"--headless=new",
		"--no-sandbox",
		"--disable-dev-shm-usage",
		"--disable-background-timer-throttling",
		"--disable-backgrounding-occluded-windows",
		"--disable-renderer-backgrounding",
		"--disable-features=TranslateUI",
		"--disable-extensions",
		"--metrics-recording-only",
		"--mute-audio",
		"--disable-gpu",
		"--disable-software-rasterizer",
		"--disable-dev-tools",
		"--disable-session-crashed-bubble",
		"--disable-infobars",
		"--window-size=1920,1080",
		"--incognito",
		"--deterministic-fetch",
	]
	.into_iter()
	.map(str::to_string)
	.collect()
}

/// Settings for starting chromedriver and the browsers it spawns.
#[derive(Debug, Clone)]
pub struct DriverConfig {
	/// Explicit chromedriver path from configuration.
	pub executable: Option<PathBuf>,
	/// Chrome binary passed through `goog:chromeOptions.binary`.
	pub chrome_binary: Option<PathBuf>,
	/// Chrome command-line flags.
	pub chrome_args: Vec<String>,
	/// How long to wait for `/status` to report ready.
	pub startup_timeout: Duration,
	/// Upper bound for a single non-navigation HTTP command.
	pub command_timeout: Duration,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			executable: None,
			chrome_binary: None,
			chrome_args: default_chrome_args(),
			startup_timeout: Duration::from_secs(10),
			command_timeout: Duration::from_secs(30),
		}
	}
}

impl DriverConfig {
	/// Chrome options sent with every new session.
	pub fn chrome_options(&self) -> ChromeOptions {
		ChromeOptions {
			args: self.chrome_args.clone(),
			binary: self.chrome_binary.as_ref().map(|p| p.display().to_string()),
		}
	}

	/// Resolves the chromedriver executable.
	///
	/// Order: `CHROMEDRIVER_PATH`, configured path, `PATH` lookup, then
	/// [`FALLBACK_CHROMEDRIVER_PATH`].
	pub fn resolve_executable(&self) -> Result<PathBuf> {
		let from_env = std::env::var_os(CHROMEDRIVER_PATH_ENV)
			.filter(|v| !v.is_empty())
			.map(PathBuf::from);
		let from_path = which::which("chromedriver").ok();
		resolve_executable_from(from_env, self.executable.clone(), from_path, Path::new(FALLBACK_CHROMEDRIVER_PATH))
	}
}

fn resolve_executable_from(from_env: Option<PathBuf>, configured: Option<PathBuf>, from_path: Option<PathBuf>, fallback: &Path) -> Result<PathBuf> {
	let mut tried = Vec::new();

	for candidate in [from_env, configured].into_iter().flatten() {
		if candidate.is_file() {
			return Ok(candidate);
		}
		tried.push(candidate.display().to_string());
	}

	if let Some(found) = from_path {
		return Ok(found);
	}
	tried.push("PATH".to_string());

	if fallback.is_file() {
		return Ok(fallback.to_path_buf());
	}
	tried.push(fallback.display().to_string());

	Err(DriverError::ExecutableNotFound { tried: tried.join(", ") })
}
