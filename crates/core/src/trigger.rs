//! Firing the reboot action.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cancel::{or_cancel, pause};
use crate::error::{CapabilityError, Result};
use crate::login::LoginSequencer;
use crate::policy::Timings;
use crate::session::Session;
use crate::target::{Credentials, FormLocators, RouterEndpoint};

/// Opens the reboot page and clicks the confirm control.
#[derive(Debug, Clone, Copy)]
pub struct RebootTrigger<'a> {
	login: LoginSequencer<'a>,
	locators: &'a FormLocators,
	timings: &'a Timings,
	cancel: &'a CancellationToken,
}

impl<'a> RebootTrigger<'a> {
	pub fn new(login: LoginSequencer<'a>, locators: &'a FormLocators, timings: &'a Timings, cancel: &'a CancellationToken) -> Self {
		Self {
			login,
			locators,
			timings,
			cancel,
		}
	}

	/// `true` once the reboot click has been dispatched.
	///
	/// Does not wait for the device to go down. A redirect to the login page
	/// triggers exactly one re-login on the same session.
	pub async fn trigger_reboot(&self, session: &mut Session, endpoint: &RouterEndpoint, credentials: &Credentials) -> bool {
		match self.try_trigger(session, endpoint, credentials).await {
			Ok(true) => true,
			Ok(false) => false,
			Err(e) => {
				warn!(target = "rr.trigger", error = %e.summary(), "reboot trigger failed");
				false
			}
		}
	}

	async fn try_trigger(&self, session: &mut Session, endpoint: &RouterEndpoint, credentials: &Credentials) -> Result<bool> {
		let cancel = self.cancel;
		let url = endpoint.reboot_url();

		info!(target = "rr.trigger", url = %url, "opening reboot page");
		or_cancel(cancel, session.navigate(&url, self.timings.page_load_timeout)).await?;

		let landed = or_cancel(cancel, session.current_url()).await?;
		if endpoint.is_login_page(&landed) {
			info!(target = "rr.trigger", "re-authentication required, logging in again");
			if !self.login.login(session, endpoint, credentials).await {
				warn!(target = "rr.trigger", "re-login failed");
				return Ok(false);
			}
			or_cancel(cancel, session.navigate(&url, self.timings.page_load_timeout)).await?;
		}

		let button = or_cancel(cancel, session.wait_for_element(&self.locators.reboot_confirm, self.timings.element_timeout)).await?;
		or_cancel(cancel, session.click(&button)).await?;
		info!(target = "rr.trigger", "reboot requested, router is restarting");

		if !pause(cancel, self.timings.trigger_settle).await {
			return Err(CapabilityError::Cancelled);
		}
		Ok(true)
	}
}
