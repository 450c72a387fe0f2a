//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a scratch directory so
//! the database and config never touch the real profile.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusroom"))
        .args(args)
        .env("HOME", home)
        .env_remove("FOCUSROOM_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is a JSON event"))
        .collect()
}

#[test]
fn test_timer_status_starts_in_work() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["timer", "status"]);
    let snapshot: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["state"]["mode"], "work");
    assert_eq!(snapshot["state"]["remaining_secs"], 1500);
    assert_eq!(snapshot["state"]["running"], false);
}

#[test]
fn test_short_break_runs_to_completion() {
    let home = TempDir::new().unwrap();
    let out = run_ok(
        home.path(),
        &["timer", "run", "--mode", "short-break", "--tick-ms", "1", "--max-intervals", "1"],
    );
    let events = json_lines(&out);
    let completed: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "IntervalCompleted")
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["mode"], "short_break");
    assert!(completed[0]["verdict"].is_null());

    // Breaks are never recorded.
    let sessions = run_ok(home.path(), &["sessions", "list", "--json"]);
    let sessions: serde_json::Value = serde_json::from_str(&sessions).unwrap();
    assert_eq!(sessions.as_array().unwrap().len(), 0);
}

#[test]
fn test_work_interval_is_recorded_and_adapts() {
    let home = TempDir::new().unwrap();
    let out = run_ok(
        home.path(),
        &["timer", "run", "--tick-ms", "1", "--max-intervals", "1", "--seed", "3"],
    );
    let events = json_lines(&out);
    assert!(events.iter().any(|e| e["type"] == "DurationsAdapted"));
    let completed = events
        .iter()
        .find(|e| e["type"] == "IntervalCompleted")
        .expect("interval completed");
    assert_eq!(completed["mode"], "work");
    assert_eq!(completed["duration_secs"], 1500);
    // No classifier endpoint is configured.
    assert_eq!(completed["verdict_source"], "fallback");

    let sessions = run_ok(home.path(), &["sessions", "list", "--json"]);
    let sessions: serde_json::Value = serde_json::from_str(&sessions).unwrap();
    assert_eq!(sessions.as_array().unwrap().len(), 1);

    let stats = run_ok(home.path(), &["stats"]);
    let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["total_sessions"], 1);

    // One session: all-or-nothing focus pushes work to a bound.
    let durations = run_ok(home.path(), &["durations", "show"]);
    let durations: serde_json::Value = serde_json::from_str(&durations).unwrap();
    let work = durations["work_minutes"].as_f64().unwrap();
    assert!(work == 15.0 || work == 35.0, "work = {work}");
}

#[test]
fn test_prefs_set_and_show() {
    let home = TempDir::new().unwrap();
    run_ok(home.path(), &["prefs", "set", "auto_start_breaks", "true"]);
    let out = run_ok(home.path(), &["prefs", "show"]);
    let prefs: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(prefs["auto_start_breaks"], true);
    assert_eq!(prefs["notifications"], false);

    let (_, stderr, code) = run_cli(home.path(), &["prefs", "set", "dark_mode", "true"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_durations_set_rejects_unusable_lengths() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["durations", "set", "25", "0", "15"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    // Rounds to a zero-second interval.
    let (_, stderr, code) =
        run_cli(home.path(), &["durations", "set", "0.001", "0.001", "0.001"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("work_minutes"));

    run_ok(home.path(), &["durations", "set", "30", "6", "18"]);
}

#[test]
fn test_durations_adapt_without_history() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["durations", "adapt"]);
    assert!(out.contains("no sessions recorded"));
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(
        run_ok(home.path(), &["config", "get", "timer.tick_interval_ms"]).trim(),
        "1000"
    );
    run_ok(home.path(), &["config", "set", "timer.tick_interval_ms", "250"]);
    assert_eq!(
        run_ok(home.path(), &["config", "get", "timer.tick_interval_ms"]).trim(),
        "250"
    );

    let list = run_ok(home.path(), &["config", "list"]);
    assert!(list.contains("notifications.enabled = true"));

    let (_, _, code) = run_cli(home.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_sessions_clear() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["sessions", "clear"]);
    assert!(out.contains("removed 0 sessions"));
    assert!(run_ok(home.path(), &["sessions", "list"]).contains("No sessions recorded."));
}
