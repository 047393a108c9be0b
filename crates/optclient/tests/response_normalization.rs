#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use optclient::{OptimizerClient, OptimizerConfig, OptimizerError};
use serde_json::json;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-optimizer-tool");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("tool script should be writable");
    let mut permissions = std::fs::metadata(&path)
        .expect("tool script should exist")
        .permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).expect("tool script should be executable");
    path
}

fn client_for(tool: &Path) -> OptimizerClient {
    let config = OptimizerConfig::new("https://optimizer.example")
        .expect("valid url")
        .with_product_name("tenant-x")
        .with_cli_path(tool);
    OptimizerClient::new(config).expect("client should build without a tenant lookup")
}

#[test]
fn replies_without_a_status_field_become_successes() {
    let dir = unique_temp_dir("optclient-normalize-inject");
    let tool = write_fake_tool(&dir, r#"echo '{"results": ["a", "b"]}'"#);

    let response = client_for(&tool)
        .query_risk("SELECT 1")
        .expect("call should succeed");

    assert_eq!(response.status, "success");
    assert_eq!(response.field("results"), Some(&json!(["a", "b"])));
}

#[test]
fn explicit_status_values_pass_through_untouched() {
    let dir = unique_temp_dir("optclient-normalize-passthrough");
    let tool = write_fake_tool(&dir, r#"echo '{"status": "IN_PROGRESS", "pct": 40}'"#);

    let response = client_for(&tool)
        .query_risk("SELECT 1")
        .expect("call should succeed");

    assert_eq!(response.status, "IN_PROGRESS");
    assert_eq!(response.field("pct"), Some(&json!(40)));
}

#[test]
fn empty_output_resolves_to_the_default_error_reply() {
    let dir = unique_temp_dir("optclient-normalize-empty");
    let tool = write_fake_tool(&dir, "exit 0");

    let response = client_for(&tool)
        .query_risk("SELECT 1")
        .expect("empty output is not a transport failure");

    assert!(response.is_error());
    assert!(response.fields.is_empty());
}

#[test]
fn non_json_output_is_a_transport_failure() {
    let dir = unique_temp_dir("optclient-normalize-malformed");
    let tool = write_fake_tool(&dir, "echo 'please upgrade your tool'");

    let error = client_for(&tool)
        .query_risk("SELECT 1")
        .expect_err("garbage output must fail");

    assert!(error.is_transport());
    assert!(error.to_string().starts_with("Error while accessing Optimizer"));
}

#[test]
fn unexpected_exit_codes_are_transport_failures() {
    let dir = unique_temp_dir("optclient-normalize-exit");
    let tool = write_fake_tool(&dir, "echo 'denied' >&2\nexit 7");

    let error = client_for(&tool)
        .query_risk("SELECT 1")
        .expect_err("exit code 7 must fail");

    match &error {
        OptimizerError::Transport { message, .. } => {
            assert!(message.contains("exit code 7"), "unexpected: {message}");
            assert!(message.contains("denied"), "unexpected: {message}");
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[test]
fn exit_code_one_is_not_special_outside_upload() {
    let dir = unique_temp_dir("optclient-normalize-exit-one");
    let tool = write_fake_tool(&dir, "echo '{\"status\": \"fine\"}'\nexit 1");

    let error = client_for(&tool)
        .query_risk("SELECT 1")
        .expect_err("exit code 1 is only tolerated for upload");

    assert!(error.is_transport());
}

#[test]
fn a_missing_tool_binary_is_a_transport_failure() {
    let dir = unique_temp_dir("optclient-normalize-missing");
    let tool = dir.join("not-installed");

    let error = client_for(&tool)
        .query_risk("SELECT 1")
        .expect_err("missing binary must fail");

    assert!(error.is_transport());
    assert!(error.to_string().contains("failed to launch"));
}
