//! CLI tests for the `nql parse` subcommand.

use std::process::Command;

use assert_cmd::cargo;

fn nql_cmd() -> Command {
    Command::new(cargo::cargo_bin!("nql"))
}

#[test]
fn parse_emits_structured_json() {
    let output = nql_cmd()
        .args(["parse", r#"req -k 1 --title "My Feed" -a $me"#, "--output", "json"])
        .output()
        .expect("run parse");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid parse json");
    assert_eq!(json["command_name"], "req");
    assert_eq!(json["global_flags"]["window_props"]["title"], "My Feed");
    assert_eq!(json["props"]["command"], "req");
    assert_eq!(json["props"]["filter"]["kinds"], serde_json::json!([1]));
    assert_eq!(
        json["props"]["filter"]["authors"],
        serde_json::json!(["$me"])
    );
    assert_eq!(json["props"]["needs_account"], true);
}

#[test]
fn unknown_command_is_a_json_error_envelope() {
    let output = nql_cmd()
        .args(["parse", "frobnicate now", "--output", "json"])
        .output()
        .expect("run parse");
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid error json");
    assert_eq!(json["error"], "unknown command: frobnicate");
}

#[test]
fn malformed_quoting_fails_cleanly() {
    let output = nql_cmd()
        .args(["parse", r#"req --title "open"#, "--output", "json"])
        .output()
        .expect("run parse");
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid error json");
    assert_eq!(json["error"], "malformed quoting in command input");
}

#[test]
fn count_props_have_no_req_only_fields() {
    let output = nql_cmd()
        .args(["parse", "count -k 1,3", "--output", "json"])
        .output()
        .expect("run parse");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["props"]["command"], "count");
    assert!(json["props"].get("close_on_eose").is_none());
    assert!(json["props"].get("follow").is_none());
}

#[test]
fn pretty_mode_prints_a_summary() {
    let output = nql_cmd()
        .args(["parse", "relay admin wss://relay.example.com", "--output", "pretty"])
        .output()
        .expect("run parse");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("command: relay admin"), "stdout={stdout}");
    assert!(
        stdout.contains("wss://relay.example.com/"),
        "stdout={stdout}"
    );
}
