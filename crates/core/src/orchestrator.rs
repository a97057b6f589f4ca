//! The reboot state machine: login → trigger → await recovery, with retries.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::cancel::{or_cancel, pause};
use crate::capability::SessionFactory;
use crate::error::{CapabilityError, RebootError};
use crate::login::LoginSequencer;
use crate::policy::{RecoveryPolicy, RetryPolicy, Timings};
use crate::recovery::RecoveryPoller;
use crate::session::Session;
use crate::target::{Credentials, FormLocators, RouterEndpoint};
use crate::trigger::RebootTrigger;

/// Orchestrator states. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootState {
	Idle,
	LoggingIn,
	Triggering,
	AwaitingRecovery,
	Succeeded,
	Failed,
}

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
	Success,
	LoginFailed,
	TriggerFailed,
	RecoveryTimedOut,
	Cancelled,
}

impl fmt::Display for AttemptOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AttemptOutcome::Success => "success",
			AttemptOutcome::LoginFailed => "login failed",
			AttemptOutcome::TriggerFailed => "trigger failed",
			AttemptOutcome::RecoveryTimedOut => "recovery timed out",
			AttemptOutcome::Cancelled => "cancelled",
		};
		f.write_str(s)
	}
}

/// Per-attempt record; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
	pub attempt: u32,
	pub outcome: AttemptOutcome,
	pub detail: String,
}

impl AttemptResult {
	fn new(attempt: u32, outcome: AttemptOutcome, detail: impl Into<String>) -> Self {
		Self {
			attempt,
			outcome,
			detail: detail.into(),
		}
	}
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebootReport {
	pub attempts: Vec<AttemptResult>,
	pub final_state: RebootState,
}

impl RebootReport {
	pub fn succeeded(&self) -> bool {
		self.final_state == RebootState::Succeeded
	}

	pub fn last_outcome(&self) -> Option<AttemptOutcome> {
		self.attempts.last().map(|a| a.outcome)
	}
}

/// Top-level entry point; owns the success/failure decision.
///
/// Runs are sequential: one orchestrator must not be driven from two tasks
/// against the same device at once.
pub struct RebootOrchestrator {
	factory: Arc<dyn SessionFactory>,
	endpoint: RouterEndpoint,
	credentials: Credentials,
	retry: RetryPolicy,
	recovery: RecoveryPolicy,
	locators: FormLocators,
	timings: Timings,
	cancel: CancellationToken,
	span: Span,
}

impl RebootOrchestrator {
	pub fn new(factory: Arc<dyn SessionFactory>, endpoint: RouterEndpoint, credentials: Credentials) -> Self {
		let span = info_span!(target: "rr", "reboot", router = %endpoint.base_url());
		Self {
			factory,
			endpoint,
			credentials,
			retry: RetryPolicy::default(),
			recovery: RecoveryPolicy::default(),
			locators: FormLocators::default(),
			timings: Timings::default(),
			cancel: CancellationToken::new(),
			span,
		}
	}

	pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	pub fn with_recovery_policy(mut self, recovery: RecoveryPolicy) -> Self {
		self.recovery = recovery;
		self
	}

	pub fn with_locators(mut self, locators: FormLocators) -> Self {
		self.locators = locators;
		self
	}

	pub fn with_timings(mut self, timings: Timings) -> Self {
		self.timings = timings;
		self
	}

	/// Token that aborts the run at the next suspension point.
	pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
		self.cancel = cancel;
		self
	}

	/// Span every event of this run is recorded under.
	pub fn with_span(mut self, span: Span) -> Self {
		self.span = span;
		self
	}

	pub fn endpoint(&self) -> &RouterEndpoint {
		&self.endpoint
	}

	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Reboots the router and verifies it came back.
	///
	/// `Err` only for a backend that cannot create sessions at all; every
	/// other failure ends in a report whose final state is `Failed`.
	pub async fn reboot(&self) -> Result<RebootReport, RebootError> {
		self.run().instrument(self.span.clone()).await
	}

	async fn run(&self) -> Result<RebootReport, RebootError> {
		let max_attempts = self.retry.max_attempts.max(1);
		let mut state = RebootState::Idle;
		let mut attempts = Vec::new();

		for attempt in 1..=max_attempts {
			info!(target = "rr", attempt, max_attempts, "starting reboot attempt");
			let result = self.attempt(attempt, &mut state).await?;
			let outcome = result.outcome;

			if outcome == AttemptOutcome::Success {
				attempts.push(result);
				transition(&mut state, RebootState::Succeeded);
				info!(target = "rr", attempt, "reboot sequence completed successfully");
				return Ok(RebootReport {
					attempts,
					final_state: state,
				});
			}

			warn!(target = "rr", attempt, %outcome, detail = %result.detail, "reboot attempt failed");
			attempts.push(result);

			if outcome == AttemptOutcome::Cancelled || attempt == max_attempts {
				break;
			}

			info!(target = "rr", backoff_secs = self.retry.backoff.as_secs(), "retrying after backoff");
			if !pause(&self.cancel, self.retry.backoff).await {
				info!(target = "rr", "run cancelled during backoff");
				break;
			}
		}

		transition(&mut state, RebootState::Failed);
		error!(target = "rr", attempts = attempts.len(), "router reboot failed");
		Ok(RebootReport {
			attempts,
			final_state: state,
		})
	}

	async fn attempt(&self, attempt: u32, state: &mut RebootState) -> Result<AttemptResult, RebootError> {
		let mut session = match or_cancel(&self.cancel, Session::open(self.factory.as_ref(), "attempt")).await {
			Ok(session) => session,
			Err(CapabilityError::Cancelled) => {
				return Ok(AttemptResult::new(attempt, AttemptOutcome::Cancelled, "cancelled before the session started"));
			}
			Err(e) => return Err(RebootError::Setup(e)),
		};

		let login = LoginSequencer::new(&self.locators, &self.timings, &self.cancel);
		transition(state, RebootState::LoggingIn);
		if !login.login(&mut session, &self.endpoint, &self.credentials).await {
			session.release().await;
			return Ok(self.failure(attempt, AttemptOutcome::LoginFailed, "could not log in to the admin UI"));
		}

		let trigger = RebootTrigger::new(login, &self.locators, &self.timings, &self.cancel);
		transition(state, RebootState::Triggering);
		if !trigger.trigger_reboot(&mut session, &self.endpoint, &self.credentials).await {
			session.release().await;
			return Ok(self.failure(attempt, AttemptOutcome::TriggerFailed, "could not trigger the reboot action"));
		}

		// The device is about to drop the connection anyway.
		session.release().await;

		transition(state, RebootState::AwaitingRecovery);
		let poller = RecoveryPoller::new(self.factory.as_ref(), &self.locators, &self.cancel);
		if poller.await_recovery(&self.endpoint, &self.recovery).await {
			return Ok(AttemptResult::new(attempt, AttemptOutcome::Success, "login page reachable again"));
		}

		Ok(self.failure(
			attempt,
			AttemptOutcome::RecoveryTimedOut,
			format!("login page not reachable within {}s", self.recovery.max_wait.as_secs()),
		))
	}

	fn failure(&self, attempt: u32, outcome: AttemptOutcome, detail: impl Into<String>) -> AttemptResult {
		if self.cancel.is_cancelled() {
			AttemptResult::new(attempt, AttemptOutcome::Cancelled, "run cancelled")
		} else {
			AttemptResult::new(attempt, outcome, detail)
		}
	}
}

fn transition(state: &mut RebootState, next: RebootState) {
	debug!(target = "rr", from = ?*state, to = ?next, "state transition");
	*state = next;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn report_success_follows_final_state() {
		let report = RebootReport {
			attempts: vec![AttemptResult::new(1, AttemptOutcome::Success, "ok")],
			final_state: RebootState::Succeeded,
		};
		assert!(report.succeeded());
		assert_eq!(report.last_outcome(), Some(AttemptOutcome::Success));

		let failed = RebootReport {
			attempts: vec![],
			final_state: RebootState::Failed,
		};
		assert!(!failed.succeeded());
		assert_eq!(failed.last_outcome(), None);
	}

	#[test]
	fn transition_moves_state() {
		let mut state = RebootState::Idle;
		transition(&mut state, RebootState::LoggingIn);
		assert_eq!(state, RebootState::LoggingIn);
	}
}
