//! Scoped ownership of one browsing context.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::capability::{ElementHandle, Locator, SessionFactory, WebInteraction};
use crate::error::{CapabilityError, Result};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Exclusively owned handle to one [`WebInteraction`].
///
/// Release with [`Session::release`] on every path. If a session is dropped
/// unreleased (a future cancelled mid-step, a panic), a warning is logged and
/// the close runs as a background task on the current tokio runtime. Outside
/// a runtime the backend is discarded without closing.
pub struct Session {
	id: u64,
	purpose: &'static str,
	inner: Option<Box<dyn WebInteraction>>,
}

impl Session {
	/// Creates a fresh session from `factory`.
	pub async fn open(factory: &dyn SessionFactory, purpose: &'static str) -> Result<Self> {
		let inner = factory.create().await?;
		let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
		debug!(target = "rr.session", session = id, purpose, "session opened");
		Ok(Self {
			id,
			purpose,
			inner: Some(inner),
		})
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	fn backend(&mut self) -> Result<&mut Box<dyn WebInteraction>> {
		self.inner.as_mut().ok_or(CapabilityError::Closed)
	}

	pub async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
		self.backend()?.navigate(url, timeout).await
	}

	pub async fn wait_for_element(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
		self.backend()?.wait_for_element(locator, timeout).await
	}

	pub async fn current_url(&mut self) -> Result<String> {
		self.backend()?.current_url().await
	}

	pub async fn clear(&mut self, element: &ElementHandle) -> Result<()> {
		self.backend()?.clear(element).await
	}

	pub async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<()> {
		self.backend()?.type_text(element, text).await
	}

	pub async fn click(&mut self, element: &ElementHandle) -> Result<()> {
		self.backend()?.click(element).await
	}

	/// Closes the backend. Close failures are logged, never returned.
	pub async fn release(mut self) {
		let Some(mut inner) = self.inner.take() else {
			return;
		};
		match inner.close().await {
			Ok(()) => debug!(target = "rr.session", session = self.id, purpose = self.purpose, "session released"),
			Err(e) => warn!(target = "rr.session", session = self.id, purpose = self.purpose, error = %e, "error during session cleanup"),
		}
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		let Some(mut inner) = self.inner.take() else {
			return;
		};
		warn!(target = "rr.session", session = self.id, purpose = self.purpose, "session dropped without release");

		let Ok(handle) = tokio::runtime::Handle::try_current() else {
			return;
		};
		let id = self.id;
		handle.spawn(async move {
			if let Err(e) = inner.close().await {
				debug!(target = "rr.session", session = id, error = %e, "background close failed");
			}
		});
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("id", &self.id)
			.field("purpose", &self.purpose)
			.field("open", &self.inner.is_some())
			.finish()
	}
}
