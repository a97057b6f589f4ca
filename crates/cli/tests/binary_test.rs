use std::path::Path;
use std::process::{Command, Output};

fn router_reboot(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_router-reboot"))
		.args(args)
		.env_remove("ROUTER_REBOOT_CONFIG")
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to run router-reboot")
}

fn write_config(dir: &Path, body: &str) -> String {
	let path = dir.join("config.yml");
	std::fs::write(&path, body).expect("write config");
	path.display().to_string()
}

#[test]
fn help_exits_zero() {
	let output = router_reboot(&["--help"]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("reboot"));
	assert!(stdout.contains("probe"));
}

#[test]
fn missing_config_file_exits_one() {
	let output = router_reboot(&["-c", "/nonexistent/router-reboot.yml", "check"]);
	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("failed to read config file"), "{stderr}");
}

#[test]
fn invalid_config_exits_one_before_any_browser_starts() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	let config = write_config(
		dir.path(),
		"
router:
  connection:
    base_url: http://192.168.11.1
  endpoints:
    login: login.html
    reboot: reboot.html
  auth:
    username: admin
    password: s3cret
  options:
    retry_count: 0
",
	);

	let output = router_reboot(&["--config", &config]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("retry_count"), "{stderr}");
	assert!(!stderr.contains("s3cret"));
	Ok(())
}

#[test]
fn malformed_yaml_exits_one() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	let config = write_config(dir.path(), "router: [unterminated\n");

	let output = router_reboot(&["-c", &config, "probe"]);

	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
	Ok(())
}

#[test]
fn config_path_can_come_from_the_environment() {
	let output = Command::new(env!("CARGO_BIN_EXE_router-reboot"))
		.arg("check")
		.env("ROUTER_REBOOT_CONFIG", "/nonexistent/from-env.yml")
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to run router-reboot");

	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("from-env.yml"));
}
