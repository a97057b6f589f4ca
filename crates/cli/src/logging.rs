use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn,rr=info,rr_cli=info,router_reboot=info",
		1 => "info",
		_ => "debug,hyper=info,hyper_util=info,reqwest=info",
	}
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(verbose > 1)
		.try_init();
}
