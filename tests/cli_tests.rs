use assert_cmd::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn dbconnect() -> Command {
    let mut cmd = Command::cargo_bin("dbconnect").unwrap();
    cmd.env("RUST_LOG", "dbconnect=info,warn");
    for var in ["DB_HOST", "DB_PORT", "DB_USER", "DB_NAME", "DB_PASSWORD_ENV"] {
        cmd.env_remove(var);
    }
    cmd
}

fn unreachable_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[database]
host = "127.0.0.1"
port = 1
user = "nobody"
dbname = "missing"

[retry]
max_attempts = 5
delay_secs = 2
"#,
    )
    .unwrap();
    file
}

#[test]
fn test_cli_help_command() {
    let output = dbconnect().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--max-attempts"));
    assert!(stdout.contains("--delay"));
}

#[test]
fn test_cli_version_command() {
    let output = dbconnect().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dbconnect"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_exhaustion_exits_with_failure() {
    let config = unreachable_config();

    let output = dbconnect()
        .arg("--config")
        .arg(config.path())
        .args(["--max-attempts", "2", "--delay", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PostgreSQL connection failed (attempt 1)"));
    assert!(stdout.contains("PostgreSQL connection failed (attempt 2)"));
    assert!(!stdout.contains("(attempt 3)"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Connection failed after multiple attempts: "));
}

#[test]
fn test_invalid_config_reports_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[database\n").unwrap();

    let output = dbconnect().arg("--config").arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: failed to load configuration"));
}

#[test]
fn test_flag_overrides_zero_attempts_in_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[database]
host = "127.0.0.1"
port = 1
user = "nobody"
dbname = "missing"

[retry]
max_attempts = 0
"#,
    )
    .unwrap();

    let output = dbconnect()
        .arg("--config")
        .arg(file.path())
        .args(["--max-attempts", "1", "--delay", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PostgreSQL connection failed (attempt 1)"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Connection failed after multiple attempts: "));
    assert!(stderr.contains("refused"));
}

#[test]
fn test_zero_attempts_in_file_rejected_without_flag() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[database]
host = "127.0.0.1"
user = "nobody"
dbname = "missing"

[retry]
max_attempts = 0
"#,
    )
    .unwrap();

    let output = dbconnect().arg("--config").arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("retry.max_attempts"));
}
