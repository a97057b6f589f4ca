//! The web-interaction capability consumed by the reboot components.
//!
//! [`WebInteraction`] is one isolated browsing context; [`SessionFactory`]
//! hands out fresh ones. Components only ever see them through
//! [`Session`](crate::Session), which guarantees release.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// How a page control is identified. Always by a stable attribute, never by
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
	Id(String),
	Name(String),
	Class(String),
	Css(String),
}

impl Locator {
	pub fn id(value: impl Into<String>) -> Self {
		Self::Id(value.into())
	}

	pub fn name(value: impl Into<String>) -> Self {
		Self::Name(value.into())
	}

	pub fn class(value: impl Into<String>) -> Self {
		Self::Class(value.into())
	}

	pub fn css(value: impl Into<String>) -> Self {
		Self::Css(value.into())
	}

	/// Equivalent CSS selector.
	pub fn to_css(&self) -> String {
		match self {
			Locator::Id(v) => format!("[id=\"{}\"]", escape_attr(v)),
			Locator::Name(v) => format!("[name=\"{}\"]", escape_attr(v)),
			Locator::Class(v) => format!("[class~=\"{}\"]", escape_attr(v)),
			Locator::Css(v) => v.clone(),
		}
	}
}

fn escape_attr(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Locator::Id(v) => write!(f, "id={}", v),
			Locator::Name(v) => write!(f, "name={}", v),
			Locator::Class(v) => write!(f, "class={}", v),
			Locator::Css(v) => write!(f, "css={}", v),
		}
	}
}

/// Rejected `kind=value` locator text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid locator `{input}`: {reason}")]
pub struct LocatorParseError {
	pub input: String,
	pub reason: &'static str,
}

impl FromStr for Locator {
	type Err = LocatorParseError;

	/// Parses `id=…`, `name=…`, `class=…` or `css=…`.
	fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
		let err = |reason| LocatorParseError {
			input: input.to_string(),
			reason,
		};
		let (kind, value) = input.split_once('=').ok_or_else(|| err("expected kind=value"))?;
		let value = value.trim();
		if value.is_empty() {
			return Err(err("empty value"));
		}

		match kind.trim().to_ascii_lowercase().as_str() {
			"id" => Ok(Locator::id(value)),
			"name" => Ok(Locator::name(value)),
			"class" => Ok(Locator::class(value)),
			"css" => Ok(Locator::css(value)),
			_ => Err(err("kind must be one of id, name, class, css")),
		}
	}
}

/// Opaque reference to an element inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

/// One isolated browsing context.
///
/// Every method blocks the calling task until it completes or its own
/// timeout elapses.
#[async_trait]
pub trait WebInteraction: Send {
	/// Loads `url`, failing when the page does not load within `timeout`.
	async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

	/// Waits until `locator` matches. A zero timeout means a single lookup.
	async fn wait_for_element(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle>;

	async fn current_url(&mut self) -> Result<String>;

	async fn clear(&mut self, element: &ElementHandle) -> Result<()>;

	async fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<()>;

	async fn click(&mut self, element: &ElementHandle) -> Result<()>;

	/// Ends the browsing context. Called exactly once per instance.
	async fn close(&mut self) -> Result<()>;
}

/// Produces a fresh, isolated [`WebInteraction`] per call.
#[async_trait]
pub trait SessionFactory: Send + Sync {
	async fn create(&self) -> Result<Box<dyn WebInteraction>>;

	/// Releases factory-wide resources (e.g. the driver process).
	async fn shutdown(&self) -> Result<()> {
		Ok(())
	}
}
