//! Command execution.

use std::sync::Arc;

use rr::cancel::or_cancel;
use rr::{AttemptOutcome, CancellationToken, ProbeOutcome, RebootOrchestrator, RecoveryPoller, SessionFactory, WebDriverSessionFactory};
use tracing::{info, info_span, warn};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{CliError, Result};

pub async fn run(cli: Cli) -> Result<()> {
	let config = AppConfig::load(&cli.config)?;
	info!(target = "rr_cli", config = %cli.config.display(), router = %config.endpoint.base_url(), "configuration loaded");

	let cancel = cancel_on_interrupt();
	match cli.command() {
		Commands::Reboot => reboot(&config, cancel).await,
		Commands::Check => check(&config, cancel).await,
		Commands::Probe => probe(&config, cancel).await,
	}
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
	let cancel = CancellationToken::new();
	let token = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			warn!(target = "rr_cli", "interrupt received, stopping");
			token.cancel();
		}
	});
	cancel
}

async fn start_backend(config: &AppConfig, cancel: &CancellationToken) -> Result<Arc<WebDriverSessionFactory>> {
	let factory = or_cancel(cancel, WebDriverSessionFactory::start(config.driver.clone(), config.timings.page_load_timeout))
		.await
		.map_err(|e| if cancel.is_cancelled() { CliError::Cancelled } else { CliError::Backend(e) })?;
	info!(target = "rr_cli", driver = %factory.driver_url(), "chromedriver ready");
	Ok(Arc::new(factory))
}

async fn stop_backend(factory: &WebDriverSessionFactory) {
	if let Err(e) = factory.shutdown().await {
		warn!(target = "rr_cli", error = %e, "failed to stop chromedriver");
	}
}

async fn reboot(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
	let factory = start_backend(config, &cancel).await?;

	let span = info_span!("reboot", router = %config.endpoint.base_url(), attempts = config.retry.max_attempts);
	let orchestrator = RebootOrchestrator::new(factory.clone(), config.endpoint.clone(), config.credentials.clone())
		.with_retry_policy(config.retry)
		.with_recovery_policy(config.recovery)
		.with_locators(config.locators.clone())
		.with_timings(config.timings)
		.with_cancellation(cancel)
		.with_span(span);

	let result = orchestrator.reboot().await;
	stop_backend(&factory).await;
	let report = result?;

	if report.succeeded() {
		println!("router {} rebooted and reachable again", config.endpoint.base_url());
		return Ok(());
	}

	match report.attempts.last() {
		Some(last) if last.outcome == AttemptOutcome::Cancelled => Err(CliError::Cancelled),
		Some(last) => Err(CliError::RebootFailed {
			attempts: report.attempts.len(),
			last: format!("{}: {}", last.outcome, last.detail),
		}),
		None => Err(CliError::RebootFailed {
			attempts: 0,
			last: "no attempt ran".to_string(),
		}),
	}
}

async fn check(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
	print!("{}", config.describe());

	let factory = start_backend(config, &cancel).await?;
	println!("chromedriver:  {}", factory.driver_url());
	stop_backend(&factory).await;

	println!("configuration OK");
	Ok(())
}

async fn probe(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
	let factory = start_backend(config, &cancel).await?;
	let login_url = config.endpoint.login_url();

	let outcome = RecoveryPoller::new(factory.as_ref(), &config.locators, &cancel)
		.probe(&login_url, config.recovery.probe_timeout)
		.await;
	stop_backend(&factory).await;

	match outcome {
		ProbeOutcome::LoginReady => {
			println!("login page reachable: {login_url}");
			Ok(())
		}
		ProbeOutcome::NotReady(reason) | ProbeOutcome::SessionUnavailable(reason) => Err(CliError::Unreachable { url: login_url, reason }),
		ProbeOutcome::Cancelled => Err(CliError::Cancelled),
	}
}
