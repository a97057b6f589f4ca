//! [`WebInteraction`] backed by chromedriver.

use std::time::Duration;

use async_trait::async_trait;
use rr_protocol::{ElementReference, NewSessionParams, Timeouts};
use rr_runtime::{ChromeDriverService, DriverConfig, DriverError, RemoteSession, WebDriverClient};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::capability::{ElementHandle, Locator, SessionFactory, WebInteraction};
use crate::error::{CapabilityError, Result};

/// Poll period while waiting for an element to appear.
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

impl From<DriverError> for CapabilityError {
	fn from(err: DriverError) -> Self {
		CapabilityError::Backend(err.to_string())
	}
}

/// One chromedriver service; every [`create`](SessionFactory::create)
/// opens a new WebDriver session, i.e. a new browser with a throwaway profile.
#[derive(Debug)]
pub struct WebDriverSessionFactory {
	service: Mutex<Option<ChromeDriverService>>,
	client: WebDriverClient,
	config: DriverConfig,
	page_load_timeout: Duration,
}

impl WebDriverSessionFactory {
	/// Starts chromedriver. Failure here is a setup error, not worth retrying.
	pub async fn start(config: DriverConfig, page_load_timeout: Duration) -> Result<Self> {
		let service = ChromeDriverService::start(&config)
			.await
			.map_err(|e| CapabilityError::Setup(e.to_string()))?;
		let client = service.client().clone();
		Ok(Self {
			service: Mutex::new(Some(service)),
			client,
			config,
			page_load_timeout,
		})
	}

	/// Base URL of the running chromedriver.
	pub fn driver_url(&self) -> &str {
		self.client.base_url()
	}

	fn session_params(&self) -> NewSessionParams {
		NewSessionParams::chrome(
			self.config.chrome_options(),
			Some(Timeouts {
				page_load: Some(self.page_load_timeout.as_millis() as u64),
				implicit: Some(0),
				script: None,
			}),
		)
	}
}

#[async_trait]
impl SessionFactory for WebDriverSessionFactory {
	async fn create(&self) -> Result<Box<dyn WebInteraction>> {
		let remote = self
			.client
			.new_session(&self.session_params())
			.await
			.map_err(|e| CapabilityError::Setup(e.to_string()))?;
		Ok(Box::new(WebDriverSession { remote: Some(remote) }))
	}

	async fn shutdown(&self) -> Result<()> {
		if let Some(service) = self.service.lock().await.take() {
			service.shutdown().await?;
		}
		Ok(())
	}
}

/// A WebDriver session; the browser quits when it is closed.
#[derive(Debug)]
pub struct WebDriverSession {
	remote: Option<RemoteSession>,
}

impl WebDriverSession {
	fn remote(&self) -> Result<&RemoteSession> {
		self.remote.as_ref().ok_or(CapabilityError::Closed)
	}
}

fn element_ref(element: &ElementHandle) -> ElementReference {
	ElementReference {
		id: element.id().to_string(),
	}
}

#[async_trait]
impl WebInteraction for WebDriverSession {
	async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
		self.remote()?
			.navigate(url, timeout)
			.await
			.map_err(|e| {
				if e.is_timeout() {
					CapabilityError::Timeout {
						operation: "navigation",
						elapsed: timeout,
					}
				} else {
					CapabilityError::Navigation {
						url: url.to_string(),
						message: e.to_string(),
					}
				}
			})
	}

	async fn wait_for_element(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
		let remote = self.remote()?;
		let css = locator.to_css();
		let deadline = Instant::now() + timeout;

		loop {
			match remote.find_element(&css).await {
				Ok(found) => return Ok(ElementHandle::new(found.id)),
				Err(e) if e.is_no_such_element() => {
					let now = Instant::now();
					if now >= deadline {
						return Err(CapabilityError::ElementNotFound {
							locator: locator.to_string(),
							timeout,
						});
					}
					tokio::time::sleep(ELEMENT_POLL_INTERVAL.min(deadline - now)).await;
				}
				Err(e) => return Err(e.into()),
			}
		}
	}

	async fn current_url(&mut self) -> Result<String> {
		Ok(self.remote()?.current_url().await?)
	}

	async fn clear(&mut self, element: &ElementHandle) -> Result<()> {
		Ok(self.remote()?.clear(&element_ref(element)).await?)
	}

	async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<()> {
		Ok(self.remote()?.send_keys(&element_ref(element), text).await?)
	}

	async fn click(&mut self, element: &ElementHandle) -> Result<()> {
		Ok(self.remote()?.click(&element_ref(element)).await?)
	}

	async fn close(&mut self) -> Result<()> {
		if let Some(remote) = self.remote.take() {
			remote.delete().await?;
		}
		Ok(())
	}
}

impl Drop for WebDriverSession {
	fn drop(&mut self) {
		let Some(remote) = self.remote.take() else {
			return;
		};
		// Best effort: quit the browser in the background.
		if let Ok(handle) = tokio::runtime::Handle::try_current() {
			debug!(target = "rr.webdriver", session = %remote.id(), "deleting abandoned session");
			handle.spawn(async move {
				let _ = remote.delete().await;
			});
		}
	}
}
