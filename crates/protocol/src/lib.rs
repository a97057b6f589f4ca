//! Wire types for the W3C WebDriver protocol.
//!
//! This crate contains the serde-serializable request and response bodies
//! exchanged with a WebDriver remote end (chromedriver) over HTTP. These
//! types represent the "protocol layer": the shapes of data as they appear
//! on the wire.
//!
//! Types in this crate are pure data with no behavior beyond
//! serialization. Session handling and retries live in `rr-runtime`.

pub mod capabilities;
pub mod command;
pub mod element;
pub mod response;

pub use capabilities::*;
pub use command::*;
pub use element::*;
pub use response::*;
