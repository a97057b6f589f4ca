use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "router-reboot")]
#[command(about = "Reboot a router through its web admin UI and wait until it is back")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Configuration file
	#[arg(
		short,
		long,
		global = true,
		value_name = "FILE",
		env = "ROUTER_REBOOT_CONFIG",
		default_value = DEFAULT_CONFIG_PATH
	)]
	pub config: PathBuf,

	#[command(subcommand)]
	pub command: Option<Commands>,
}

impl Cli {
	/// Subcommand to run; `reboot` when none was given.
	pub fn command(&self) -> Commands {
		self.command.unwrap_or(Commands::Reboot)
	}
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
	/// Reboot the router and wait for the login page to return (default)
	Reboot,

	/// Validate the configuration and make sure chromedriver starts
	Check,

	/// Check once whether the login page is reachable right now
	Probe,
}
