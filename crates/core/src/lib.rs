//! Router reboot orchestration.
//!
//! Reboots a SOHO router through its web admin UI and verifies that it came
//! back: log in, fire the reboot action, then poll the login page until it
//! reappears, retrying the whole sequence per [`RetryPolicy`].
//!
//! The components only see the browser through the [`WebInteraction`] and
//! [`SessionFactory`] traits; [`webdriver`] provides the chromedriver-backed
//! implementation.
//!
//! ```ignore
//! let factory = Arc::new(WebDriverSessionFactory::start(DriverConfig::default(), Duration::from_secs(30)).await?);
//! let orchestrator = RebootOrchestrator::new(factory, endpoint, credentials)
//!     .with_retry_policy(RetryPolicy::new(3, Duration::from_secs(30)));
//! let report = orchestrator.reboot().await?;
//! assert!(report.succeeded());
//! ```

pub mod cancel;
pub mod capability;
pub mod error;
pub mod login;
pub mod orchestrator;
pub mod policy;
pub mod recovery;
pub mod session;
pub mod target;
pub mod trigger;
pub mod webdriver;

pub use capability::{ElementHandle, Locator, LocatorParseError, SessionFactory, WebInteraction};
pub use error::{CapabilityError, RebootError, Result};
pub use login::LoginSequencer;
pub use orchestrator::{AttemptOutcome, AttemptResult, RebootOrchestrator, RebootReport, RebootState};
pub use policy::{RecoveryPolicy, RetryPolicy, Timings};
pub use recovery::{ProbeOutcome, RecoveryPoller};
pub use session::Session;
pub use target::{Credentials, FormLocators, RouterEndpoint};
pub use trigger::RebootTrigger;
pub use webdriver::{WebDriverSession, WebDriverSessionFactory};

pub use rr_runtime::DriverConfig;
pub use tokio_util::sync::CancellationToken;
