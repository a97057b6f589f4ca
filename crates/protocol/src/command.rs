//! Request bodies for session commands.

use serde::{Deserialize, Serialize};

/// Body of `POST /session/{id}/url`.
#[derive(Debug, Clone, Serialize)]
pub struct NavigateParams {
	pub url: String,
}

/// Body of `POST /session/{id}/timeouts`, values in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_load: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub implicit: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script: Option<u64>,
}

/// W3C WebDriver element location strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorStrategy {
	#[serde(rename = "css selector")]
	CssSelector,
	#[serde(rename = "link text")]
	LinkText,
	#[serde(rename = "partial link text")]
	PartialLinkText,
	#[serde(rename = "tag name")]
	TagName,
	#[serde(rename = "xpath")]
	XPath,
}

/// Body of `POST /session/{id}/element`.
#[derive(Debug, Clone, Serialize)]
pub struct FindElementParams {
	pub using: LocatorStrategy,
	pub value: String,
}

impl FindElementParams {
	pub fn css(selector: impl Into<String>) -> Self {
		Self {
			using: LocatorStrategy::CssSelector,
			value: selector.into(),
		}
	}
}

/// Body of `POST /session/{id}/element/{element}/value`.
#[derive(Debug, Clone, Serialize)]
pub struct SendKeysParams {
	pub text: String,
}

/// Empty JSON object body required by commands without parameters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyParams {}
