//! `router-reboot`: reboots a router through its web admin UI and waits for
//! the login page to come back.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod run;

pub use config::{AppConfig, ConfigError};
pub use error::{CliError, Result};
