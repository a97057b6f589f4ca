//! chromedriver process lifecycle.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::WebDriverClient;
use crate::error::{DriverError, Result};
use crate::launch::DriverConfig;
use crate::process::free_port;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A running chromedriver bound to a localhost port.
///
/// The process is killed when the service is shut down or dropped.
#[derive(Debug)]
pub struct ChromeDriverService {
	child: Child,
	port: u16,
	executable: PathBuf,
	client: WebDriverClient,
}

impl ChromeDriverService {
	/// Resolves the executable, starts it and waits for `/status` to report ready.
	pub async fn start(config: &DriverConfig) -> Result<Self> {
		let executable = config.resolve_executable()?;
		Self::start_with_executable(&executable, config).await
	}

	/// Starts a specific executable, skipping path resolution.
	pub async fn start_with_executable(executable: &Path, config: &DriverConfig) -> Result<Self> {
		let port = free_port()?;

		let mut cmd = Command::new(executable);
		cmd.arg(format!("--port={}", port))
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.kill_on_drop(true);

		let child = cmd.spawn().map_err(|source| DriverError::Launch {
			path: executable.to_path_buf(),
			source,
		})?;
		debug!(target = "rr.driver", path = %executable.display(), port, pid = ?child.id(), "chromedriver spawned");

		let client = WebDriverClient::new(format!("http://127.0.0.1:{}", port), config.command_timeout)?;
		let mut service = Self {
			child,
			port,
			executable: executable.to_path_buf(),
			client,
		};
		service.wait_ready(config.startup_timeout).await?;

		info!(target = "rr.driver", path = %service.executable.display(), port, "chromedriver ready");
		Ok(service)
	}

	async fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
		let deadline = Instant::now() + timeout;
		let mut last_error = "endpoint not reachable".to_string();

		loop {
			if let Some(status) = self.child.try_wait()? {
				return Err(DriverError::NotReady(format!(
					"{} exited before accepting connections (status: {})",
					self.executable.display(),
					status
				)));
			}

			match self.client.status().await {
				Ok(status) if status.ready => return Ok(()),
				Ok(status) => last_error = format!("not ready: {}", status.message),
				Err(e) => last_error = e.to_string(),
			}

			if Instant::now() >= deadline {
				break;
			}
			tokio::time::sleep(READY_POLL_INTERVAL).await;
		}

		Err(DriverError::NotReady(format!(
			"no ready status on port {} within {}s; last error: {}",
			self.port,
			timeout.as_secs(),
			last_error
		)))
	}

	pub fn client(&self) -> &WebDriverClient {
		&self.client
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	pub fn executable(&self) -> &Path {
		&self.executable
	}

	/// Stops the process and reaps it.
	pub async fn shutdown(mut self) -> Result<()> {
		if self.child.try_wait()?.is_none() {
			if let Err(e) = self.child.kill().await {
				warn!(target = "rr.driver", error = %e, "failed to kill chromedriver");
				return Err(e.into());
			}
		}
		debug!(target = "rr.driver", port = self.port, "chromedriver stopped");
		Ok(())
	}
}
