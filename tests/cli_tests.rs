//! End-to-end checks of the qtop binary's non-interactive commands.

mod common;

use std::fs;

use serde_json::Value;

use common::run_cli_case;

fn parse_json_line(stdout: &str) -> Value {
    let line = stdout.lines().next().expect("one JSON line on stdout");
    serde_json::from_str(line).expect("stdout is JSON")
}

#[test]
fn keys_json_lists_every_sort_selector() {
    let home = tempfile::tempdir().expect("tempdir");
    let result = run_cli_case("keys-json", home.path(), &["keys", "--json"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = parse_json_line(&result.stdout);
    assert_eq!(payload["command"], "keys");
    let keys: Vec<&str> = payload["sort_keys"]
        .as_array()
        .expect("sort_keys array")
        .iter()
        .filter_map(|k| k["key"].as_str())
        .collect();
    assert_eq!(keys, ["D", "E", "R", "T", "M", "Q"]);

    let defaults: Vec<&Value> = payload["sort_keys"]
        .as_array()
        .expect("sort_keys array")
        .iter()
        .filter(|k| k["default"] == true)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["column"], "executions");
    assert!(!payload["bindings"].as_array().expect("bindings").is_empty());
}

#[test]
fn config_json_reflects_file_values() {
    let home = tempfile::tempdir().expect("tempdir");
    let config_path = home.path().join("qtop.toml");
    fs::write(
        &config_path,
        "[dashboard]\nrefresh_ms = 250\ndefault_sort = \"exec_time\"\nfollow_bottom = false\n",
    )
    .expect("write config");

    let result = run_cli_case(
        "config-json",
        home.path(),
        &["--config", config_path.to_str().expect("utf8 path"), "config", "--json"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = parse_json_line(&result.stdout);
    assert_eq!(payload["command"], "config");
    assert_eq!(payload["config"]["dashboard"]["refresh_ms"], 250);
    assert_eq!(payload["config"]["dashboard"]["default_sort"], "exec_time");
    assert_eq!(payload["config"]["dashboard"]["follow_bottom"], false);
    assert_eq!(payload["config_hash"].as_str().map(str::len), Some(16));
}

#[test]
fn config_defaults_without_a_file() {
    let home = tempfile::tempdir().expect("tempdir");
    let result = run_cli_case("config-defaults", home.path(), &["config", "--json"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = parse_json_line(&result.stdout);
    assert_eq!(payload["config"]["dashboard"]["refresh_ms"], 1000);
    assert_eq!(payload["config"]["dashboard"]["follow_bottom"], true);
}

#[test]
fn missing_explicit_config_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let missing = home.path().join("absent.toml");
    let result = run_cli_case(
        "config-missing",
        home.path(),
        &["--config", missing.to_str().expect("utf8 path"), "config"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr.contains("QTOP-1002"), "stderr: {}", result.stderr);
}

#[test]
fn invalid_config_value_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let config_path = home.path().join("qtop.toml");
    fs::write(&config_path, "[dashboard]\nrefresh_ms = 5\n").expect("write config");
    let result = run_cli_case(
        "config-invalid",
        home.path(),
        &["--config", config_path.to_str().expect("utf8 path"), "config"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr.contains("QTOP-1001"), "stderr: {}", result.stderr);
}

#[test]
fn dashboard_rejects_unknown_sort_column_before_touching_the_terminal() {
    let home = tempfile::tempdir().expect("tempdir");
    let result = run_cli_case(
        "dashboard-bad-sort",
        home.path(),
        &["dashboard", "--sort", "bogus"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr.contains("QTOP-2003"), "stderr: {}", result.stderr);
}

#[test]
fn completions_bash_mentions_binary() {
    let home = tempfile::tempdir().expect("tempdir");
    let result = run_cli_case("completions-bash", home.path(), &["completions", "bash"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stdout.contains("qtop"));
    assert!(result.stdout.contains("dashboard"));
}
