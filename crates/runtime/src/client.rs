//! Async W3C WebDriver HTTP client.

use std::time::Duration;

use reqwest::Method;
use rr_protocol::{
	ElementReference, EmptyParams, FindElementParams, NavigateParams, NewSessionParams, NewSessionResponse, SendKeysParams, StatusResponse, Timeouts,
	WireError, WireResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DriverError, Result};

/// Extra time granted to the HTTP layer on top of the page-load timeout, so
/// the remote end reports the timeout instead of the socket.
const NAVIGATION_SLACK: Duration = Duration::from_secs(5);

/// Client bound to one WebDriver remote end.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
	http: reqwest::Client,
	base_url: String,
	command_timeout: Duration,
}

impl WebDriverClient {
	/// Creates a client for `base_url` (e.g. `http://127.0.0.1:9515`).
	pub fn new(base_url: impl Into<String>, command_timeout: Duration) -> Result<Self> {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		let http = reqwest::Client::builder()
			.build()
			.map_err(|source| DriverError::Transport {
				url: base_url.clone(),
				source,
			})?;
		Ok(Self {
			http,
			base_url,
			command_timeout,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Queries `/status`.
	pub async fn status(&self) -> Result<StatusResponse> {
		self.execute::<EmptyParams, _>(Method::GET, "/status", None, self.command_timeout).await
	}

	/// Opens a new session; the remote end launches a fresh browser for it.
	pub async fn new_session(&self, params: &NewSessionParams) -> Result<RemoteSession> {
		// Browser start-up can take a while on small containers.
		let timeout = self.command_timeout * 2;
		let created: NewSessionResponse = self.execute(Method::POST, "/session", Some(params), timeout).await?;
		debug!(target = "rr.webdriver", session = %created.session_id, "session created");
		Ok(RemoteSession {
			client: self.clone(),
			id: created.session_id,
		})
	}

	async fn execute<B, T>(&self, method: Method, path: &str, body: Option<&B>, timeout: Duration) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let url = format!("{}{}", self.base_url, path);
		let mut request = self.http.request(method, &url).timeout(timeout);
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await.map_err(|source| DriverError::Transport {
			url: url.clone(),
			source,
		})?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(|source| DriverError::Transport {
			url: url.clone(),
			source,
		})?;

		if !status.is_success() {
			return Err(match serde_json::from_slice::<WireResponse<WireError>>(&bytes) {
				Ok(body) => DriverError::Remote {
					status: status.as_u16(),
					code: body.value.error,
					message: body.value.message,
				},
				Err(_) => DriverError::Protocol(format!("HTTP {} from {}: {}", status, path, String::from_utf8_lossy(&bytes))),
			});
		}

		serde_json::from_slice::<WireResponse<T>>(&bytes)
			.map(|body| body.value)
			.map_err(|e| DriverError::Protocol(format!("{}: {}", path, e)))
	}
}

/// An open WebDriver session.
#[derive(Debug, Clone)]
pub struct RemoteSession {
	client: WebDriverClient,
	id: String,
}

impl RemoteSession {
	pub fn id(&self) -> &str {
		&self.id
	}

	fn path(&self, suffix: &str) -> String {
		format!("/session/{}{}", self.id, suffix)
	}

	/// Sets session timeouts.
	pub async fn set_timeouts(&self, timeouts: Timeouts) -> Result<()> {
		self.client
			.execute(Method::POST, &self.path("/timeouts"), Some(&timeouts), self.client.command_timeout)
			.await
	}

	/// Navigates and waits for the load, bounded by `page_load`.
	pub async fn navigate(&self, url: &str, page_load: Duration) -> Result<()> {
		self.set_timeouts(Timeouts {
			page_load: Some(page_load.as_millis() as u64),
			..Default::default()
		})
		.await?;

		let params = NavigateParams { url: url.to_string() };
		self.client
			.execute(Method::POST, &self.path("/url"), Some(&params), page_load + NAVIGATION_SLACK)
			.await
	}

	pub async fn current_url(&self) -> Result<String> {
		self.client
			.execute::<EmptyParams, _>(Method::GET, &self.path("/url"), None, self.client.command_timeout)
			.await
	}

	/// Single lookup by CSS selector; no implicit wait.
	pub async fn find_element(&self, css: &str) -> Result<ElementReference> {
		let params = FindElementParams::css(css);
		self.client
			.execute(Method::POST, &self.path("/element"), Some(&params), self.client.command_timeout)
			.await
	}

	pub async fn clear(&self, element: &ElementReference) -> Result<()> {
		self.element_command(element, "/clear", &EmptyParams::default()).await
	}

	pub async fn send_keys(&self, element: &ElementReference, text: &str) -> Result<()> {
		let params = SendKeysParams { text: text.to_string() };
		self.element_command(element, "/value", &params).await
	}

	pub async fn click(&self, element: &ElementReference) -> Result<()> {
		self.element_command(element, "/click", &EmptyParams::default()).await
	}

	async fn element_command<B: Serialize>(&self, element: &ElementReference, action: &str, body: &B) -> Result<()> {
		let path = self.path(&format!("/element/{}{}", element.id, action));
		self.client.execute(Method::POST, &path, Some(body), self.client.command_timeout).await
	}

	/// Ends the session; the remote end quits the browser.
	pub async fn delete(&self) -> Result<()> {
		self.client
			.execute::<EmptyParams, ()>(Method::DELETE, &self.path(""), None, self.client.command_timeout)
			.await?;
		debug!(target = "rr.webdriver", session = %self.id, "session deleted");
		Ok(())
	}
}
