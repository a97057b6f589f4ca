//! Web element references.

use serde::{Deserialize, Serialize};

/// JSON key identifying a web element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4f8e9c4c8b7b";

/// Reference to an element inside a session, as returned by find commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementReference {
	#[serde(rename = "element-6066-11e4-a52f-4f8e9c4c8b7b")]
	pub id: String,
}
