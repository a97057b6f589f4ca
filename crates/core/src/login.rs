//! Authenticating against the router's admin UI.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cancel::{or_cancel, pause};
use crate::error::{CapabilityError, Result};
use crate::policy::Timings;
use crate::session::Session;
use crate::target::{Credentials, FormLocators, RouterEndpoint};

/// Fills and submits the login form on a caller-owned session.
#[derive(Debug, Clone, Copy)]
pub struct LoginSequencer<'a> {
	locators: &'a FormLocators,
	timings: &'a Timings,
	cancel: &'a CancellationToken,
}

impl<'a> LoginSequencer<'a> {
	pub fn new(locators: &'a FormLocators, timings: &'a Timings, cancel: &'a CancellationToken) -> Self {
		Self { locators, timings, cancel }
	}

	/// Logs in; `true` once the browser has left the login page.
	///
	/// Never fails: every error, including a form that never appears, is
	/// logged and reported as `false`. The session stays open.
	pub async fn login(&self, session: &mut Session, endpoint: &RouterEndpoint, credentials: &Credentials) -> bool {
		match self.try_login(session, endpoint, credentials).await {
			Ok(true) => {
				info!(target = "rr.login", "login successful");
				true
			}
			Ok(false) => false,
			Err(e) => {
				warn!(target = "rr.login", error = %e.summary(), "login failed");
				false
			}
		}
	}

	async fn try_login(&self, session: &mut Session, endpoint: &RouterEndpoint, credentials: &Credentials) -> Result<bool> {
		let cancel = self.cancel;
		let timings = self.timings;
		let url = endpoint.login_url();

		debug!(target = "rr.login", url = %url, "opening login page");
		or_cancel(cancel, session.navigate(&url, timings.page_load_timeout)).await?;

		let username = match or_cancel(cancel, session.wait_for_element(&self.locators.username, timings.element_timeout)).await {
			Ok(element) => element,
			Err(CapabilityError::ElementNotFound { locator, .. }) => {
				warn!(target = "rr.login", %locator, "login form not available");
				return Ok(false);
			}
			Err(e) => return Err(e),
		};
		or_cancel(cancel, session.clear(&username)).await?;
		or_cancel(cancel, session.type_text(&username, credentials.username())).await?;

		let password = or_cancel(cancel, session.wait_for_element(&self.locators.password, timings.element_timeout)).await?;
		or_cancel(cancel, session.clear(&password)).await?;
		or_cancel(cancel, session.type_text(&password, credentials.password())).await?;

		let submit = or_cancel(cancel, session.wait_for_element(&self.locators.login_submit, timings.element_timeout)).await?;
		or_cancel(cancel, session.click(&submit)).await?;

		if !pause(cancel, timings.login_settle).await {
			return Err(CapabilityError::Cancelled);
		}

		let landed = or_cancel(cancel, session.current_url()).await?;
		if endpoint.is_login_page(&landed) {
			warn!(target = "rr.login", url = %landed, "still on login page after submit");
			return Ok(false);
		}
		Ok(true)
	}
}
