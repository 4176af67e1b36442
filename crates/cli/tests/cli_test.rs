//! End-to-end tests for the `envlog` binary.

use assert_cmd::Command;
use serde_json::Value;

fn envlog() -> Command {
    let mut cmd = Command::cargo_bin("envlog").unwrap();
    cmd.env_remove("LOG_LEVEL")
        .env_remove("FORCE_LOG_LINE_NUMBERS_AND_BE_SLOW")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).unwrap()
}

fn json_lines(text: &str) -> Vec<Value> {
    text.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_resolve_uses_environment_rules() {
    let out = stdout_of(
        envlog()
            .env("LOG_LEVEL", "api:info, worker:trace, *:fatal")
            .args(["resolve", "worker"]),
    );
    assert_eq!(out.trim(), "trace");

    let out = stdout_of(
        envlog()
            .env("LOG_LEVEL", "api:info, worker:trace, *:fatal")
            .args(["resolve", "scheduler"]),
    );
    assert_eq!(out.trim(), "fatal");
}

#[test]
fn test_resolve_defaults() {
    assert_eq!(stdout_of(envlog().args(["resolve", "a"])).trim(), "info");
    assert_eq!(
        stdout_of(envlog().args(["resolve", "a", "--level", "debug"])).trim(),
        "debug"
    );
}

#[test]
fn test_resolve_rejects_malformed_rules() {
    let output = envlog()
        .args(["resolve", "scheduler", "--rules", "bogus"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Log levels must use format name:level not bogus"), "{stderr}");
}

#[test]
fn test_check_lists_rules_in_order() {
    let out = stdout_of(envlog().args(["check", "*:warn, myname:trace"]));
    assert_eq!(out, "*\twarn\nmyname\ttrace\n");

    let output = envlog().args(["check", "api:loud"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_emit_compat_record() {
    let out = stdout_of(envlog().args(["emit", "svc", "--subsystem", "svc:main", "hello %s", "world"]));
    let lines = json_lines(&out);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["name"], "svc");
    assert_eq!(lines[0]["level"], 40);
    assert_eq!(lines[0]["source_name"], "svc:main");
    assert_eq!(lines[0]["is_compat"], true);
    assert_eq!(lines[0]["msg"], "hello world");
}

#[test]
fn test_emit_alert_and_json_args() {
    let out = stdout_of(envlog().args(["emit", "svc", "[alert-operator] %j", r#"{"a":1}"#]));
    let lines = json_lines(&out);
    assert_eq!(lines[0]["level"], 60);
    assert_eq!(lines[0]["alert"], true);
    assert_eq!(lines[0]["msg"], r#"[alert-operator] {"a":1}"#);
    assert!(lines[0].get("source_name").is_none());
}

#[test]
fn test_emit_respects_environment_level() {
    let out = stdout_of(envlog().env("LOG_LEVEL", "svc:error").args(["emit", "svc", "quiet"]));
    assert!(out.is_empty(), "{out}");
}

#[test]
fn test_emit_without_arguments_fails() {
    let output = envlog().args(["emit", "svc"]).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_emit_with_source_locations() {
    let out = stdout_of(
        envlog()
            .env("FORCE_LOG_LINE_NUMBERS_AND_BE_SLOW", "1")
            .args(["emit", "svc", "where"]),
    );
    let lines = json_lines(&out);
    assert!(lines[0]["src"]["file"].as_str().unwrap().ends_with(".rs"));
}

#[test]
fn test_demo_output() {
    let out = stdout_of(envlog().args(["demo"]));
    let lines = json_lines(&out);

    assert_eq!(lines[0]["msg"], r#"this is a test of json: {"a":1} formatting"#);
    assert_eq!(lines[1]["alert"], true);
    // trace and debug are below the default info level.
    let msgs: Vec<&str> = lines.iter().map(|l| l["msg"].as_str().unwrap()).collect();
    assert!(!msgs.contains(&"trace"));
    assert!(!msgs.contains(&"debug"));
    assert!(msgs.contains(&"fatal"));
    assert!(lines.iter().any(|l| l["api_method"] == "/v1/ping"));
    assert_eq!(
        lines.iter().filter(|l| l["msg"] == "Killed all instances").count(),
        4
    );
}
