#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use qtop::columns::Value;
use qtop::columns::plancache;
use qtop::snapshot::Snapshot;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_qtop") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "qtop.exe" } else { "qtop" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve qtop binary path for integration test"),
    }
}

/// Run the qtop binary with `args`, isolated from the caller's home and
/// `QTOP_*` environment, and keep a transcript next to the temp dir.
pub fn run_cli_case(case_name: &str, home: &Path, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("qtop-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command
        .args(args)
        .env("HOME", home)
        .env("RUST_BACKTRACE", "1")
        .env_remove("QTOP_OUTPUT_FORMAT");
    for (key, _) in std::env::vars() {
        if key.starts_with("QTOP_") {
            command.env_remove(key);
        }
    }
    let output = command.output().expect("execute qtop command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// One plan-cache entry with the given execution rate and average time.
pub fn plan_entry(snap: Snapshot, key: &str, execs: i64, exec_ms: f64) -> Snapshot {
    snap.with_entry(
        key,
        [
            (plancache::DATABASE, Value::from("sales")),
            (plancache::EXECUTIONS, Value::Int(execs)),
            (plancache::ROWS, Value::Int(execs * 3)),
            (plancache::EXEC_TIME, Value::Float(exec_ms)),
            (plancache::MEMORY, Value::Int(8_192)),
            (plancache::QUERY, Value::from(format!("select * from t where id = {key}"))),
        ],
    )
}

/// Snapshot of `(key, executions)` pairs with a fixed execution time.
pub fn plan_snapshot(entries: &[(&str, i64)]) -> Snapshot {
    entries
        .iter()
        .fold(Snapshot::new(), |snap, (key, execs)| plan_entry(snap, key, *execs, 1.0))
}
