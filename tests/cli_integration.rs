// CLI integration tests for resolve and list flows.
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

const TABLE: &str =
    r#"{"default":"720p","720p":{"w":1280,"h":720},"1080p":{"w":1920,"h":1080}}"#;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_resmode");
    Command::new(exe)
}

fn write_table(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("resolution.json");
    std::fs::write(&path, contents).expect("write table");
    path
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn stdout_text(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn bare_invocation_prints_default_height() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_table(&temp, TABLE);

    let output = cmd()
        .current_dir(temp.path())
        .output()
        .expect("resolve");
    assert!(output.status.success());
    assert_eq!(stdout_text(&output), "720\n");
}

#[test]
fn field_selects_width_and_both() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, TABLE);

    let width = cmd()
        .args(["--file", path.to_str().unwrap(), "--field", "width"])
        .output()
        .expect("width");
    assert!(width.status.success());
    assert_eq!(stdout_text(&width), "1280\n");

    let both = cmd()
        .args(["--file", path.to_str().unwrap(), "--field", "both"])
        .output()
        .expect("both");
    assert!(both.status.success());
    assert_eq!(stdout_text(&both), "1280x720\n");
}

#[test]
fn json_output_names_the_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, TABLE);

    let output = cmd()
        .args(["--file", path.to_str().unwrap(), "--json"])
        .output()
        .expect("json");
    assert!(output.status.success());
    let value = parse_json(stdout_text(&output).trim());
    assert_eq!(value.get("name").unwrap().as_str().unwrap(), "720p");
    assert_eq!(value.get("width").unwrap().as_u64().unwrap(), 1280);
    assert_eq!(value.get("height").unwrap().as_u64().unwrap(), 720);
}

#[test]
fn list_emits_one_line_per_entry_with_default_marker() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, TABLE);

    let output = cmd()
        .args(["list", "--file", path.to_str().unwrap()])
        .output()
        .expect("list");
    assert!(output.status.success());

    let text = stdout_text(&output);
    let lines: Vec<Value> = text.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].get("name").unwrap().as_str().unwrap(), "720p");
    assert_eq!(lines[0].get("default"), Some(&Value::Bool(true)));
    assert_eq!(lines[1].get("name").unwrap().as_str().unwrap(), "1080p");
    assert!(lines[1].get("default").is_none());
    assert_eq!(lines[1].get("width").unwrap().as_u64().unwrap(), 1920);
}

#[test]
fn missing_default_key_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, r#"{"720p":{"w":1280,"h":720}}"#);

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code().unwrap(), 3);
    assert!(output.stdout.is_empty());
}

#[test]
fn dangling_default_name_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, r#"{"default":"4k","720p":{"w":1280,"h":720}}"#);

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code().unwrap(), 3);
}

#[test]
fn non_integer_width_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, r#"{"default":"720p","720p":{"w":"1280","h":720}}"#);

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code().unwrap(), 4);
}

#[test]
fn malformed_table_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, r#"{"default":"720p","#);

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code().unwrap(), 5);
}

#[test]
fn missing_file_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.json");

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code().unwrap(), 6);
}

#[test]
fn usage_error_exit_code() {
    let output = cmd().args(["--field", "diagonal"]).output().expect("run");
    assert_eq!(output.status.code().unwrap(), 2);
}

#[test]
fn piped_stderr_is_structured_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_table(&temp, r#"{"default":"4k","720p":{"w":1280,"h":720}}"#);

    let output = cmd()
        .args(["--file", path.to_str().unwrap()])
        .output()
        .expect("resolve");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let value = parse_json(stderr.lines().next().expect("stderr line"));
    let err = value
        .get("error")
        .and_then(|v| v.as_object())
        .expect("error object");
    assert_eq!(err.get("kind").and_then(|v| v.as_str()), Some("MissingKey"));
    assert_eq!(err.get("key").and_then(|v| v.as_str()), Some("4k"));
    assert!(
        err.get("hint")
            .and_then(|v| v.as_str())
            .expect("hint")
            .contains("720p")
    );
}

#[test]
fn completion_script_mentions_binary() {
    let output = cmd().args(["completion", "bash"]).output().expect("completion");
    assert!(output.status.success());
    assert!(stdout_text(&output).contains("resmode"));
}
