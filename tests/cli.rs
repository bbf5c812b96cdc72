use assert_cmd::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const DATASET: &str = r#"[
    {"courseId": "1", "name": "ITSC 1212 - Intro I", "links": []},
    {"courseId": "2", "name": "ITSC 1213 - Intro II", "links": ["1", "2"]},
    {"courseId": "3", "name": "ITSC 1600 - Computing Professionals", "links": ["2"]},
    {"courseId": "4", "name": "ITSC 2214 - Data Structures", "links": ["2"]}
]"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn cmd() -> Command {
    Command::new(assert_cmd::cargo_bin!("tangled-tree"))
}

#[test]
fn renders_svg_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);

    let output = cmd().arg(&input).output().unwrap();

    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("ITSC 2214 - Data Structures"));
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);
    let out = dir.path().join("tree.svg");

    cmd().arg(&input).arg("-o").arg(&out).assert().success();

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("</svg>"));
}

#[test]
fn exports_json_with_selection() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);

    let output = cmd()
        .arg(&input)
        .args(["--format", "json", "--select", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["selection"]["id"], "2");
    assert_eq!(value["selection"]["ancestors"], serde_json::json!(["1"]));
    assert_eq!(value["selection"]["descendants"], serde_json::json!(["3", "4"]));
    assert_eq!(value["layout"]["nodes"].as_array().unwrap().len(), 4);
}

#[test]
fn leveled_input_reports_dangling_parent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        &dir,
        "levels.json",
        r#"[[{"id": "A"}], [{"id": "D", "parents": ["ZZZ", "A"]}]]"#,
    );

    let output = cmd()
        .arg(&input)
        .args(["--levels", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("warning: Node D: parent ZZZ not found"));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["layout"]["links"].as_array().unwrap().len(), 1);
}

#[test]
fn options_file_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);
    let options = write(&dir, "options.json", r#"{"nodeWidth": 120, "metroD": 6}"#);

    let output = cmd()
        .arg(&input)
        .arg("--options")
        .arg(&options)
        .args(["--format", "json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["layout"]["layout"]["nodeWidth"], 120.0);
    assert_eq!(value["layout"]["layout"]["metroD"], 6.0);

    let output = cmd()
        .arg(&input)
        .arg("--options")
        .arg(&options)
        .args(["--format", "json", "--node-width", "300"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["layout"]["layout"]["nodeWidth"], 300.0);
}

#[test]
fn zero_node_width_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);

    let output = cmd().arg(&input).args(["--node-width", "0"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("nodeWidth must be positive"));
}

#[test]
fn unknown_selection_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", DATASET);

    let output = cmd().arg(&input).args(["--select", "999"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Unknown node: 999"));
}

#[test]
fn malformed_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "courses.json", r#"[{"courseId": "1", "name": "A"}, {"courseId": "1", "name": "B"}]"#);

    let output = cmd().arg(&input).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Duplicate course id: 1"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = cmd().arg(dir.path().join("absent.json")).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Failed to read"));
}
