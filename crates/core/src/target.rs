//! The router being rebooted: where it lives, how to log in, which controls to use.

use std::fmt;

use url::Url;

use crate::capability::Locator;

/// Base URL plus the relative login and reboot pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterEndpoint {
	base_url: String,
	login_path: String,
	reboot_path: String,
}

impl RouterEndpoint {
	pub fn new(base_url: impl Into<String>, login_path: impl Into<String>, reboot_path: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			login_path: login_path.into(),
			reboot_path: reboot_path.into(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	pub fn reboot_path(&self) -> &str {
		&self.reboot_path
	}

	pub fn login_url(&self) -> String {
		join(&self.base_url, &self.login_path)
	}

	pub fn reboot_url(&self) -> String {
		join(&self.base_url, &self.reboot_path)
	}

	/// Whether `url` still points at the login page.
	///
	/// Only the path is compared; host, query and fragment are ignored.
	pub fn is_login_page(&self, url: &str) -> bool {
		if self.login_path.trim_matches('/').is_empty() {
			return false;
		}
		let (Ok(landed), Ok(login)) = (Url::parse(url), Url::parse(&self.login_url())) else {
			return false;
		};
		landed.path().trim_end_matches('/') == login.path().trim_end_matches('/')
	}
}

fn join(base: &str, path: &str) -> String {
	format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Admin credentials. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	username: String,
	password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn password(&self) -> &str {
		&self.password
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Locators of the four controls the reboot flow touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLocators {
	pub username: Locator,
	pub password: Locator,
	pub login_submit: Locator,
	pub reboot_confirm: Locator,
}

impl Default for FormLocators {
	fn default() -> Self {
		Self {
			username: Locator::name("airstation_uname"),
			password: Locator::name("airstation_pass"),
			login_submit: Locator::class("button_login"),
			reboot_confirm: Locator::name("reboot"),
		}
	}
}
