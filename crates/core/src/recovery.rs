//! Detecting that the router is back after a reboot.
//!
//! While the device restarts, every layer below the browser misbehaves:
//! connections are refused, DNS fails, pages load halfway. Each probe
//! therefore runs in its own brand-new session, and nothing a probe does
//! can fail the poll as a whole.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cancel::{or_cancel, pause};
use crate::capability::SessionFactory;
use crate::error::CapabilityError;
use crate::policy::RecoveryPolicy;
use crate::session::Session;
use crate::target::{FormLocators, RouterEndpoint};

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
	/// The login form is present.
	LoginReady,
	/// The device did not answer, or answered without a login form.
	NotReady(String),
	/// No session could be created for the probe.
	SessionUnavailable(String),
	Cancelled,
}

/// Polls the login page with short-lived sessions until it reappears.
#[derive(Clone, Copy)]
pub struct RecoveryPoller<'a> {
	factory: &'a dyn SessionFactory,
	locators: &'a FormLocators,
	cancel: &'a CancellationToken,
}

impl<'a> RecoveryPoller<'a> {
	pub fn new(factory: &'a dyn SessionFactory, locators: &'a FormLocators, cancel: &'a CancellationToken) -> Self {
		Self { factory, locators, cancel }
	}

	/// `true` on the first probe that sees the login form; `false` once the
	/// budget is spent or the run is cancelled.
	pub async fn await_recovery(&self, endpoint: &RouterEndpoint, policy: &RecoveryPolicy) -> bool {
		let login_url = endpoint.login_url();
		info!(
			target = "rr.recovery",
			url = %login_url,
			grace_secs = policy.initial_grace.as_secs(),
			"waiting for router to complete reboot"
		);

		if !pause(self.cancel, policy.initial_grace).await {
			info!(target = "rr.recovery", "recovery wait cancelled");
			return false;
		}

		let started = Instant::now();
		let mut probe = 0u32;
		while started.elapsed() < policy.max_wait {
			probe += 1;
			match self.probe(&login_url, policy.probe_timeout).await {
				ProbeOutcome::LoginReady => {
					info!(target = "rr.recovery", probe, "login screen detected, router has completed reboot");
					return true;
				}
				ProbeOutcome::NotReady(reason) => {
					info!(target = "rr.recovery", probe, %reason, "router not responding yet");
				}
				ProbeOutcome::SessionUnavailable(reason) => {
					warn!(target = "rr.recovery", probe, %reason, "failed to create probe session");
				}
				ProbeOutcome::Cancelled => {
					info!(target = "rr.recovery", "recovery wait cancelled");
					return false;
				}
			}

			let remaining = policy.max_wait.saturating_sub(started.elapsed());
			if remaining.is_zero() {
				break;
			}
			info!(target = "rr.recovery", remaining_secs = remaining.as_secs(), "still waiting for router to come online");
			if !pause(self.cancel, policy.poll_interval.min(remaining)).await {
				info!(target = "rr.recovery", "recovery wait cancelled");
				return false;
			}
		}

		warn!(
			target = "rr.recovery",
			max_wait_secs = policy.max_wait.as_secs(),
			probes = probe,
			"router did not come online in time"
		);
		false
	}

	/// One probe: fresh session, short navigation, immediate form lookup.
	///
	/// Opening the session counts against `timeout` too, so a browser that is
	/// slow to start cannot stretch the probe. The session is released before
	/// returning, whatever happened.
	pub async fn probe(&self, login_url: &str, timeout: Duration) -> ProbeOutcome {
		let deadline = Instant::now() + timeout;
		let timed_out = |operation: &'static str| CapabilityError::Timeout { operation, elapsed: timeout };

		let open = async {
			tokio::time::timeout_at(deadline, Session::open(self.factory, "probe"))
				.await
				.unwrap_or_else(|_| Err(timed_out("probe session start")))
		};
		let mut session = match or_cancel(self.cancel, open).await {
			Ok(session) => session,
			Err(CapabilityError::Cancelled) => return ProbeOutcome::Cancelled,
			Err(e) => return ProbeOutcome::SessionUnavailable(e.summary()),
		};

		let username = &self.locators.username;
		let check = async {
			session.navigate(login_url, timeout).await?;
			session.wait_for_element(username, Duration::ZERO).await.map(|_| ())
		};
		let bounded = async { tokio::time::timeout_at(deadline, check).await.unwrap_or_else(|_| Err(timed_out("probe"))) };
		let result = or_cancel(self.cancel, bounded).await;

		session.release().await;

		match result {
			Ok(()) => ProbeOutcome::LoginReady,
			Err(CapabilityError::Cancelled) => ProbeOutcome::Cancelled,
			Err(e) => ProbeOutcome::NotReady(e.summary()),
		}
	}
}
