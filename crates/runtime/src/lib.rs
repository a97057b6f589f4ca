//! chromedriver lifecycle and WebDriver HTTP client.
//!
//! [`ChromeDriverService`] owns the driver process; [`WebDriverClient`] and
//! [`RemoteSession`] speak the W3C protocol to it. Higher layers decide
//! what a failure means; this crate only reports it.

pub mod client;
pub mod error;
pub mod launch;
pub mod process;
pub mod service;

pub use client::{RemoteSession, WebDriverClient};
pub use error::{DriverError, Result};
pub use launch::{DriverConfig, default_chrome_args};
pub use service::ChromeDriverService;
