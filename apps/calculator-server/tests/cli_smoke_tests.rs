#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the calculator-server binary

use std::process::{Command, Stdio};

use tempfile::TempDir;

fn run_calculator_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_calculator-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute calculator-server")
}

#[test]
fn test_cli_help_command() {
    let output = run_calculator_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--port"), "Should mention port option");
}

#[test]
fn test_cli_version_command() {
    let output = run_calculator_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("calculator-server"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_calculator_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad subcommand: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_calculator_server(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_unknown_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.yaml");
    std::fs::write(&config_path, "gateway:\n  validate_everything: true\n").unwrap();

    let output = run_calculator_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Unknown keys should be rejected");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "server:\n  bind_addr: 127.0.0.1:8088\nlogging:\n  level: warn\n",
    )
    .unwrap();

    let output = run_calculator_server(&["--config", config_path.to_str().unwrap(), "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "check should pass: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("API contract declares 6 operations"));
}

#[test]
fn test_cli_check_rejects_broken_contract_file() {
    let temp_dir = TempDir::new().unwrap();
    let contract_path = temp_dir.path().join("contract.json");
    std::fs::write(&contract_path, r#"{"swagger":"2.0","paths":{}}"#).unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!("gateway:\n  contract_path: {}\n", contract_path.display()),
    )
    .unwrap();

    let output = run_calculator_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let output = run_calculator_server(&["--print-config", "--port", "4321"]);
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["server"]["bind_addr"], "127.0.0.1:4321");
    assert_eq!(config["gateway"]["request_timeout"], "30s");
    assert_eq!(config["calculator"]["seed"], true);
}
