use clap::Parser;
use rr_cli::{cli::Cli, logging, run};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = run::run(cli).await {
		error!(target = "router-reboot", error = %err, "command failed");
		std::process::exit(1);
	}
}
