#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn missing_port() -> PathBuf {
    PathBuf::from(format!(
        "/tmp/airchat-missing-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

fn airchat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_airchat"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("airchat should run")
}

#[test]
fn channels_json_lists_both_banks() {
    let output = airchat(&["--format", "json", "channels"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid json");
    let rows = rows.as_array().expect("array of channels");
    assert_eq!(rows.len(), 16);
    assert_eq!(rows[0]["label"], "CH00");
    assert_eq!(rows[0]["modulation"], "2-FSK");
    assert_eq!(rows[11]["label"], "CH13");
    assert_eq!(rows[15]["label"], "CH17");
    assert_eq!(rows[15]["modulation"], "OOK");
}

#[test]
fn version_reports_package_version() {
    let output = airchat(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("airchat {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_reports_link_defaults() {
    let output = airchat(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("baud_rate: 1200"));
    assert!(stdout.contains("pacing_interval_ms: 3000"));
}

#[test]
fn send_to_missing_port_is_transport_error() {
    let port = missing_port();
    let output = airchat(&[
        "send",
        port.to_str().expect("utf-8 path"),
        "--username",
        "alice",
        "--channel",
        "2",
        "hello",
    ]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("link unavailable"));
}

#[test]
fn chat_on_missing_port_is_transport_error() {
    let port = missing_port();
    let output = airchat(&["chat", port.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn send_rejects_bad_username_before_opening_port() {
    let port = missing_port();
    let output = airchat(&[
        "send",
        port.to_str().expect("utf-8 path"),
        "--username",
        "ab",
        "--channel",
        "2",
        "hello",
    ]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid username"));
}

#[test]
fn send_rejects_out_of_range_channel() {
    let port = missing_port();
    let output = airchat(&[
        "send",
        port.to_str().expect("utf-8 path"),
        "--username",
        "alice",
        "--channel",
        "16",
        "hello",
    ]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn zero_pacing_is_usage_error() {
    let port = missing_port();
    let output = airchat(&[
        "send",
        port.to_str().expect("utf-8 path"),
        "--pacing",
        "0s",
        "--username",
        "alice",
        "--channel",
        "1",
        "hello",
    ]);
    assert_eq!(output.status.code(), Some(64));
}
