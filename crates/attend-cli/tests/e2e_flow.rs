//! End-to-end tests for the complete check-in flow.
//!
//! Drives the `attend` binary with a scripted tap sequence on stdin and
//! checks both the console output and the session record files. The
//! late margin is stretched to a full day so every test tap lands in the
//! sentinel session and the file stem stays stable for the whole run.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn attend_binary() -> String {
    env!("CARGO_BIN_EXE_attend").to_string()
}

/// Builds an `attend` command with an isolated config environment.
fn attend_command(temp: &TempDir) -> Command {
    let mut command = Command::new(attend_binary());
    command
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env("ATTEND_VAR_DIR", temp.path().join("var"))
        .env("ATTEND_ROSTER_PATH", temp.path().join("roster.csv"))
        .env("ATTEND_LATE_MARGIN_MINUTES", "1440");
    command
}

/// Writes a two-person roster into the temp directory.
fn write_roster(temp: &TempDir) {
    std::fs::write(
        temp.path().join("roster.csv"),
        "# section A\nS100,Jane Doe,じぇーん,F\nS101,John Roe,じょん,M\n",
    )
    .unwrap();
}

/// Runs `attend run` with the given stdin script and returns its stdout.
fn run_attend(temp: &TempDir, input: &str) -> String {
    write_roster(temp);

    let mut child = attend_command(temp)
        .arg("run")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn attend run");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "attend run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Returns the attendance and unknown-card files currently in var/.
fn session_files(temp: &TempDir) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut attendance = Vec::new();
    let mut unknown = Vec::new();
    for entry in std::fs::read_dir(temp.path().join("var")).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        if name.ends_with(".unknown.csv") {
            unknown.push(path);
        } else if name.ends_with(".csv") {
            attendance.push(path);
        }
    }
    (attendance, unknown)
}

#[test]
fn test_run_records_and_deduplicates_taps() {
    let temp = TempDir::new().unwrap();

    let stdout = run_attend(&temp, "S100\nS100\nS101\nS100\nZ999\nZ999\n");

    // First S100 tap checks in; the immediate repeat is silent; the
    // repeat after S101 prints the already-checked-in notice.
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "checked in: S100\tJane Doe",
            "checked in: S101\tJohn Roe",
            "already checked in: S100\tJane Doe",
            "unknown card: Z999 (#1)",
        ]
    );

    let (attendance, unknown) = session_files(&temp);
    assert_eq!(attendance.len(), 1);
    assert_eq!(unknown.len(), 1);

    let attendance_content = std::fs::read_to_string(&attendance[0]).unwrap();
    assert_eq!(attendance_content.lines().count(), 2);
    assert!(attendance_content.contains("S100\tJane Doe\tじぇーん\tF"));
    assert!(attendance_content.contains("S101\tJohn Roe\tじょん\tM"));

    let unknown_content = std::fs::read_to_string(&unknown[0]).unwrap();
    assert_eq!(unknown_content.lines().count(), 1);
    assert!(unknown_content.contains("Z999\t1"));
}

#[test]
fn test_restart_does_not_check_in_twice() {
    let temp = TempDir::new().unwrap();

    let first = run_attend(&temp, "S100\n");
    assert!(first.contains("checked in: S100"));

    // Second process in the same session: the store replays the file, so
    // the tap is reported as already checked in and no line is appended.
    let second = run_attend(&temp, "S100\n");
    assert!(second.contains("already checked in: S100"));

    let (attendance, _) = session_files(&temp);
    assert_eq!(attendance.len(), 1);
    let content = std::fs::read_to_string(&attendance[0]).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_unknown_sequence_resumes_after_restart() {
    let temp = TempDir::new().unwrap();

    let first = run_attend(&temp, "Z999\n");
    assert!(first.contains("unknown card: Z999 (#1)"));

    // Restarted process: Z999 is replayed (suppressed), a new unknown
    // card continues the sequence instead of reusing 1.
    let second = run_attend(&temp, "Z999\nZ998\n");
    assert!(!second.contains("Z999"));
    assert!(second.contains("unknown card: Z998 (#2)"));
}

#[test]
fn test_status_and_report_reflect_recorded_session() {
    let temp = TempDir::new().unwrap();

    run_attend(&temp, "S100\nZ999\n");

    let report = attend_command(&temp)
        .arg("report")
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        report.status.success(),
        "attend report should succeed: {}",
        String::from_utf8_lossy(&report.stderr)
    );

    let rows: serde_json::Value =
        serde_json::from_slice(&report.stdout).expect("report --json should emit valid JSON");
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "S100");
    assert_eq!(rows[0]["fullname"], "Jane Doe");

    let status = attend_command(&temp).arg("status").output().unwrap();
    assert!(status.status.success());
    let status = String::from_utf8(status.stdout).unwrap();
    assert!(status.contains("Roster: 2 people"));
    assert!(status.contains("Checked in: 1"));
    assert!(status.contains("Unknown cards: 1"));
}
