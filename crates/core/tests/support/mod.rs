// Scripted in-memory router used by the integration tests.
//
// One `FakeRouter` models the device; every `create()` hands out a session
// with its own cookies (authenticated flag) and typed form values. The
// device goes down on the reboot click and refuses navigations until the
// scenario says it is back.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rr::{CapabilityError, Credentials, ElementHandle, FormLocators, Locator, RecoveryPolicy, Result, RouterEndpoint, SessionFactory, WebInteraction};
use tokio::time::Instant;

pub const BASE_URL: &str = "http://192.168.11.1";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";

/// Device behaviour for one test.
#[derive(Debug, Clone)]
pub struct Scenario {
	pub accept_login: bool,
	/// Reboot-page loads that bounce to the login page although the session logged in.
	pub reboot_redirects: usize,
	/// Navigations refused after the reboot click before the device answers again.
	pub down_for: usize,
	/// While down, navigations hang instead of failing fast.
	pub hang_while_down: bool,
	pub reboot_button: bool,
	/// 1-based `create()` calls that fail.
	pub failing_creates: Vec<usize>,
	/// Browser start-up time for every `create()`.
	pub create_delay: Duration,
	pub broken_current_url: bool,
}

impl Default for Scenario {
	fn default() -> Self {
		Self {
			accept_login: true,
			reboot_redirects: 0,
			down_for: 0,
			hang_while_down: false,
			reboot_button: true,
			failing_creates: Vec::new(),
			create_delay: Duration::ZERO,
			broken_current_url: false,
		}
	}
}

impl Scenario {
	pub fn never_recovers() -> Self {
		Self {
			down_for: usize::MAX,
			..Default::default()
		}
	}
}

/// What the device saw.
#[derive(Debug, Clone, Default)]
pub struct Observed {
	pub create_calls: usize,
	pub created: usize,
	pub closed: usize,
	pub login_submits: usize,
	pub reboot_clicks: usize,
	pub login_navigations: Vec<Instant>,
	pub reboot_clicked_at: Option<Instant>,
	pub recovered_at: Option<Instant>,
}

#[derive(Debug)]
struct Device {
	scenario: Scenario,
	observed: Observed,
	down: bool,
	refused: usize,
	redirects_left: usize,
}

#[derive(Debug, Clone)]
pub struct FakeRouter {
	device: Arc<Mutex<Device>>,
}

impl FakeRouter {
	pub fn new(scenario: Scenario) -> Self {
		let redirects_left = scenario.reboot_redirects;
		Self {
			device: Arc::new(Mutex::new(Device {
				scenario,
				observed: Observed::default(),
				down: false,
				refused: 0,
				redirects_left,
			})),
		}
	}

	pub fn observed(&self) -> Observed {
		self.device.lock().unwrap().observed.clone()
	}

	/// Puts the device into the post-reboot state without a login.
	pub fn power_cycle(&self) {
		let mut device = self.device.lock().unwrap();
		device.down = true;
		device.refused = 0;
	}
}

pub fn endpoint() -> RouterEndpoint {
	RouterEndpoint::new(BASE_URL, "login.html", "reboot.html")
}

pub fn credentials() -> Credentials {
	Credentials::new(USERNAME, PASSWORD)
}

pub fn recovery_policy() -> RecoveryPolicy {
	RecoveryPolicy {
		initial_grace: Duration::from_secs(20),
		max_wait: Duration::from_secs(60),
		poll_interval: Duration::from_secs(10),
		probe_timeout: Duration::from_secs(10),
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[async_trait]
impl SessionFactory for FakeRouter {
	async fn create(&self) -> Result<Box<dyn WebInteraction>> {
		let delay = self.device.lock().unwrap().scenario.create_delay;
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		let mut device = self.device.lock().unwrap();
		device.observed.create_calls += 1;
		let call = device.observed.create_calls;
		if device.scenario.failing_creates.contains(&call) {
			return Err(CapabilityError::Setup("chromedriver unavailable".into()));
		}
		device.observed.created += 1;
		drop(device);

		Ok(Box::new(FakeSession {
			device: Arc::clone(&self.device),
			current_url: "about:blank".to_string(),
			authenticated: false,
			typed: HashMap::new(),
		}))
	}
}

struct FakeSession {
	device: Arc<Mutex<Device>>,
	current_url: String,
	authenticated: bool,
	typed: HashMap<String, String>,
}

enum NavStep {
	Refuse,
	Hang,
	Proceed,
}

impl FakeSession {
	fn element_id(&self, locator: &Locator) -> Option<&'static str> {
		let defaults = FormLocators::default();
		let device = self.device.lock().unwrap();
		let ep = endpoint();
		if ep.is_login_page(&self.current_url) {
			if *locator == defaults.username {
				return Some("username");
			}
			if *locator == defaults.password {
				return Some("password");
			}
			if *locator == defaults.login_submit {
				return Some("submit");
			}
		}
		if self.current_url == ep.reboot_url() && device.scenario.reboot_button && *locator == defaults.reboot_confirm {
			return Some("reboot");
		}
		None
	}
}

#[async_trait]
impl WebInteraction for FakeSession {
	async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
		let ep = endpoint();
		let step = {
			let mut device = self.device.lock().unwrap();
			if url == ep.login_url() {
				device.observed.login_navigations.push(Instant::now());
			}
			if device.down {
				if device.refused < device.scenario.down_for {
					device.refused += 1;
					if device.scenario.hang_while_down { NavStep::Hang } else { NavStep::Refuse }
				} else {
					device.down = false;
					device.observed.recovered_at = Some(Instant::now());
					NavStep::Proceed
				}
			} else {
				NavStep::Proceed
			}
		};

		match step {
			NavStep::Refuse => {
				return Err(CapabilityError::Navigation {
					url: url.to_string(),
					message: "unknown error: net::ERR_CONNECTION_REFUSED\n  (Session info: chrome=126.0)".into(),
				});
			}
			NavStep::Hang => {
				tokio::time::sleep(timeout).await;
				return Err(CapabilityError::Timeout {
					operation: "navigation",
					elapsed: timeout,
				});
			}
			NavStep::Proceed => {}
		}

		if url == ep.reboot_url() {
			let mut device = self.device.lock().unwrap();
			let bounced = if !self.authenticated {
				true
			} else if device.redirects_left > 0 {
				device.redirects_left -= 1;
				self.authenticated = false;
				true
			} else {
				false
			};
			self.current_url = if bounced { format!("{}?next=reboot.html", ep.login_url()) } else { ep.reboot_url() };
		} else {
			self.current_url = url.to_string();
		}
		Ok(())
	}

	async fn wait_for_element(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
		match self.element_id(locator) {
			Some(id) => Ok(ElementHandle::new(id)),
			None => {
				tokio::time::sleep(timeout).await;
				Err(CapabilityError::ElementNotFound {
					locator: locator.to_string(),
					timeout,
				})
			}
		}
	}

	async fn current_url(&mut self) -> Result<String> {
		if self.device.lock().unwrap().scenario.broken_current_url {
			return Err(CapabilityError::Backend("invalid session id".into()));
		}
		Ok(self.current_url.clone())
	}

	async fn clear(&mut self, element: &ElementHandle) -> Result<()> {
		self.typed.remove(element.id());
		Ok(())
	}

	async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<()> {
		self.typed.entry(element.id().to_string()).or_default().push_str(text);
		Ok(())
	}

	async fn click(&mut self, element: &ElementHandle) -> Result<()> {
		let mut device = self.device.lock().unwrap();
		match element.id() {
			"submit" => {
				device.observed.login_submits += 1;
				let matches = self.typed.get("username").map(String::as_str) == Some(USERNAME)
					&& self.typed.get("password").map(String::as_str) == Some(PASSWORD);
				if device.scenario.accept_login && matches {
					self.authenticated = true;
					self.current_url = format!("{}/index.html", BASE_URL);
				}
			}
			"reboot" => {
				device.observed.reboot_clicks += 1;
				device.observed.reboot_clicked_at = Some(Instant::now());
				device.down = true;
				device.refused = 0;
			}
			_ => {}
		}
		Ok(())
	}

	async fn close(&mut self) -> Result<()> {
		self.device.lock().unwrap().observed.closed += 1;
		Ok(())
	}
}
