//! Tests for the compiled `cowork` binary

use std::process::{Command, Output};

fn cowork(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cowork"));
    command
        .args(args)
        .env_remove("COWORK_CONFIG")
        .env_remove("COWORK_API_URL")
        .env_remove("COWORK_API_KEY")
        .env_remove("COWORK_TIMEOUT_SECS")
        .env_remove("COWORK_RETRIES")
        .env("RUST_LOG", "off");
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("failed to run cowork binary")
}

fn config_entry<'a>(json: &'a serde_json::Value, key: &str) -> &'a serde_json::Value {
    json["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .find(|row| row["key"] == key)
        .expect("missing config key")
}

#[test]
fn test_config_json_reports_defaults() {
    let output = run(&mut cowork(&["config", "--json"]));
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["status"], "success");

    let url = config_entry(&json, "api_url");
    assert_eq!(url["value"], "http://localhost:3001");
    assert_eq!(url["source"], "Default");
    assert_eq!(config_entry(&json, "api_key")["value"], "(unset)");
}

#[test]
fn test_config_precedence_env_then_cli() {
    let output = run(
        cowork(&["config", "--json", "--retries", "3"])
            .env("COWORK_API_URL", "https://api.example.com/prod")
            .env("COWORK_RETRIES", "1"),
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let url = config_entry(&json, "api_url");
    assert_eq!(url["value"], "https://api.example.com/prod");
    assert_eq!(url["source"], "Environment");

    let retries = config_entry(&json, "retries");
    assert_eq!(retries["value"], "3");
    assert_eq!(retries["source"], "Cli");
}

#[test]
fn test_config_human_output_has_table() {
    let output = run(&mut cowork(&["config"]));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("api_url"));
    assert!(stdout.contains("Configuration Precedence"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run(&mut cowork(&["config", "--config", "/nonexistent/cowork.toml"]));
    assert!(!output.status.success());
}

#[test]
fn test_invalid_space_id_is_rejected() {
    let output = run(&mut cowork(&["space", "abc"]));
    assert!(!output.status.success());
}

#[test]
fn test_unreachable_api_fails() {
    let output = run(&mut cowork(&["services", "--api-url", "http://127.0.0.1:1", "--timeout", "2"]));
    assert!(!output.status.success());
}
