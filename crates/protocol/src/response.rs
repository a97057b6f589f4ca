//! Response envelopes returned by the remote end.

use serde::Deserialize;
use serde_json::Value;

/// Every WebDriver response wraps its payload in a `value` member.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse<T> {
	pub value: T,
}

/// Error payload carried in `value` for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct WireError {
	pub error: String,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub stacktrace: Option<String>,
}

/// Well-known W3C error codes the client reacts to.
pub mod error_code {
	pub const NO_SUCH_ELEMENT: &str = "no such element";
	pub const STALE_ELEMENT_REFERENCE: &str = "stale element reference";
	pub const TIMEOUT: &str = "timeout";
	pub const INVALID_SESSION_ID: &str = "invalid session id";
	pub const UNKNOWN_ERROR: &str = "unknown error";
}

/// Result of `POST /session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
	pub session_id: String,
	#[serde(default)]
	pub capabilities: Value,
}

/// Result of `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
	pub ready: bool,
	#[serde(default)]
	pub message: String,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::ElementReference;

	#[test]
	fn error_envelope_parses_code_and_message() {
		let body = json!({
			"value": {
				"error": "no such element",
				"message": "no such element: Unable to locate element",
				"stacktrace": ""
			}
		});
		let response: WireResponse<WireError> = serde_json::from_value(body).unwrap();
		assert_eq!(response.value.error, error_code::NO_SUCH_ELEMENT);
		assert!(response.value.message.starts_with("no such element"));
	}

	#[test]
	fn new_session_response_reads_session_id() {
		let body = json!({
			"value": {
				"sessionId": "4d2c1f",
				"capabilities": { "browserName": "chrome" }
			}
		});
		let response: WireResponse<NewSessionResponse> = serde_json::from_value(body).unwrap();
		assert_eq!(response.value.session_id, "4d2c1f");
		assert_eq!(response.value.capabilities["browserName"], "chrome");
	}

	#[test]
	fn find_element_response_wraps_reference() {
		let body = json!({ "value": { "element-6066-11e4-a52f-4f8e9c4c8b7b": "abc" } });
		let response: WireResponse<ElementReference> = serde_json::from_value(body).unwrap();
		assert_eq!(response.value.id, "abc");
	}

	#[test]
	fn null_value_deserializes_to_unit() {
		let response = serde_json::from_value::<WireResponse<()>>(json!({ "value": null }));
		assert!(response.is_ok());
	}
}
