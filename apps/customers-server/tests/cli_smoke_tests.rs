//! CLI smoke tests for the customers-server binary
//!
//! These tests verify help output, configuration validation and that `run`
//! actually serves the customer API.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Helper to run the customers-server binary with given arguments
fn run_customers_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_customers-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute customers-server")
}

/// Write a config whose home_dir lives inside the temp dir
fn write_config(dir: &TempDir, name: &str, body: &str) -> String {
    let home = dir.path().join("home").to_string_lossy().replace('\\', "/");
    let content = format!("server:\n  home_dir: \"{home}\"\n  host: \"127.0.0.1\"\n  port: 8087\n{body}");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().into_owned()
}

const QUIET_LOGGING: &str = r#"
logging:
  default:
    console_level: warn
    file: ""
"#;

#[test]
fn test_cli_help_command() {
    let output = run_customers_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_customers_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("customers-server"), "Should contain binary name");
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_customers_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad command: {stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    for flag in ["--config", "-c"] {
        let output = run_customers_server(&[flag, "/nonexistent/config.yaml", "check"]);
        assert!(!output.status.success(), "Should fail with missing config");

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("not found"), "Should mention the missing file: {stderr}");
    }
}

#[test]
fn test_cli_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").unwrap();

    let output = run_customers_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "{stderr}");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "valid.yaml",
        &format!(
            r#"
database:
  url: "sqlite://database/customers.db"
{QUIET_LOGGING}
modules:
  customers:
    base_path: "/api"
    max_batch_size: 50
  api_ingress:
    enable_docs: true
"#
        ),
    );

    let output = run_customers_server(&["--config", &config_path, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("max_batch_size: 50"));
}

#[test]
fn test_cli_check_rejects_bad_module_section() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "bad_module.yaml",
        &format!(
            r#"{QUIET_LOGGING}
modules:
  customers:
    max_batch_size: "lots"
"#
        ),
    );

    let output = run_customers_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("customers"), "{stderr}");
}

#[test]
fn test_cli_mock_flag_overrides_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "mock.yaml",
        &format!(
            r#"
database:
  url: "mysql://localhost/nonexistent"
{QUIET_LOGGING}"#
        ),
    );

    // unsupported backend fails the check on its own
    let output = run_customers_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());

    let output = run_customers_server(&["--config", &config_path, "--mock", "--print-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sqlite::memory:"), "{stdout}");

    let output = run_customers_server(&["--config", &config_path, "--mock", "check"]);
    assert!(output.status.success(), "--mock should replace the database");
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_customers_server(&["run", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_customers_server(&["check", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("free port")
}

/// Minimal HTTP/1.1 exchange; returns the raw response text
async fn http(port: u16, method: &str, path: &str, body: Option<&str>) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await?;
    let body = body.unwrap_or("");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await?;
    let mut out = String::new();
    stream.read_to_string(&mut out).await?;
    Ok(out)
}

async fn wait_for_health(port: u16) -> bool {
    for _ in 0..100 {
        if let Ok(resp) = http(port, "GET", "/health", None).await {
            if resp.starts_with("HTTP/1.1 200") {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::test]
async fn test_cli_run_serves_customer_api() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "run.yaml", QUIET_LOGGING);
    let port = free_port();

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_customers-server"))
        .args(["--config", &config_path, "--mock", "--port", &port.to_string(), "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn customers-server");

    assert!(wait_for_health(port).await, "server did not become healthy");

    let created = http(
        port,
        "POST",
        "/api/customers",
        Some(r#"{"first_name":"Irfan","last_name":"Khan","date_of_birth":"1990-05-17"}"#),
    )
    .await
    .unwrap();
    assert!(created.starts_with("HTTP/1.1 201"), "{created}");
    assert!(created.to_ascii_lowercase().contains("location: /api/customers/"));
    assert!(created.to_ascii_lowercase().contains("x-request-id:"));

    let listed = http(port, "GET", "/api/customers?name=Irfan", None)
        .await
        .unwrap();
    assert!(listed.starts_with("HTTP/1.1 200"), "{listed}");
    assert!(listed.contains("\"last_name\":\"Khan\""));

    child.kill().await.expect("kill");
}

#[test]
fn test_cli_run_creates_sqlite_file_under_home() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "file.yaml",
        &format!(
            r#"
database:
  url: "sqlite://db/customers.db"
{QUIET_LOGGING}
modules:
  api_ingress:
    bind_addr: "not-an-address"
"#
        ),
    );

    // migrations run before binding, so the bad address fails only after the DB exists
    let output = run_customers_server(&["--config", &config_path, "run"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid bind address"), "{stderr}");
    assert!(Path::new(&temp_dir.path().join("home/db/customers.db")).exists());
}
