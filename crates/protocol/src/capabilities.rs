//! New-session capability payloads.

use serde::{Deserialize, Serialize};

use crate::command::Timeouts;

/// Body of `POST /session`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionParams {
	pub capabilities: CapabilitiesRequest,
}

/// W3C capability negotiation envelope. Only `alwaysMatch` is used.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
	pub always_match: BrowserCapabilities,
}

/// Capabilities requested for a Chrome session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCapabilities {
	pub browser_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_load_strategy: Option<PageLoadStrategy>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timeouts: Option<Timeouts>,
	#[serde(rename = "goog:chromeOptions")]
	pub chrome_options: ChromeOptions,
}

/// Chrome-specific launch options (`goog:chromeOptions`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChromeOptions {
	pub args: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub binary: Option<String>,
}

/// Document readiness the remote end waits for after navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLoadStrategy {
	#[default]
	Normal,
	Eager,
	None,
}

impl NewSessionParams {
	/// Builds a Chrome session request with the given launch arguments.
	pub fn chrome(chrome_options: ChromeOptions, timeouts: Option<Timeouts>) -> Self {
		Self {
			capabilities: CapabilitiesRequest {
				always_match: BrowserCapabilities {
					browser_name: "chrome".to_string(),
					page_load_strategy: Some(PageLoadStrategy::Normal),
					timeouts,
					chrome_options,
				},
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn chrome_session_request_uses_w3c_envelope() {
		let params = NewSessionParams::chrome(
			ChromeOptions {
				args: vec!["--headless=new".to_string()],
				binary: None,
			},
			Some(Timeouts {
				page_load: Some(30_000),
				implicit: Some(0),
				script: None,
			}),
		);

		let value = serde_json::to_value(&params).unwrap();
		assert_eq!(
			value,
			json!({
				"capabilities": {
					"alwaysMatch": {
						"browserName": "chrome",
						"pageLoadStrategy": "normal",
						"timeouts": { "pageLoad": 30000, "implicit": 0 },
						"goog:chromeOptions": { "args": ["--headless=new"] }
					}
				}
			})
		);
	}
}
