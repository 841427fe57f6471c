use std::{fs, path::Path, process::Command};

use serde_json::Value;
use tempfile::TempDir;

const REFERENCE: &str = r#"[
    {"title": "Foo", "version": "25500", "image_url": "foo.png", "dx_lev_mas": "13.5"},
    {"title": "Bar", "version": "20000", "lev_exp": "12+", "lev_exp_i": "12.4"}
]"#;

fn processor() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_dx-rating-processor"));
    command
        .env("RUST_LOG", "error")
        .env_remove("DXR_REFERENCE_URL")
        .env_remove("DXR_VERSION_THRESHOLD")
        .env_remove("DXR_MODE");
    command
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.display().to_string()
}

#[test]
fn test_rate_prints_report() {
    let dir = TempDir::new().unwrap();
    let reference = write(&dir, "reference.json", REFERENCE);
    let records = write(
        &dir,
        "records.json",
        r#"[{"sheetId": "Foo__x__dx__y__master", "achievementRate": 99.2},
            {"sheetId": "Bar__x__std__y__expert", "achievementRate": 100.1}]"#
    );

    let output = processor()
        .current_dir(dir.path())
        .args(["--reference-file", reference.as_str(), "rate", records.as_str()])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["recentList"][0]["rating"], 278);
    assert_eq!(report["olderList"][0]["rating"], 268);
    assert_eq!(report["totals"]["total"], 546);
}

#[test]
fn test_rate_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let reference = write(&dir, "reference.json", REFERENCE);
    let records = write(&dir, "records.json", "[]");
    let output_path = dir.path().join("report.json");

    let output = processor()
        .current_dir(dir.path())
        .args(["--reference-file", reference.as_str(), "rate", records.as_str(), "--output"])
        .arg(&output_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(report["totals"]["total"], 0);
    assert_eq!(report["recentList"].as_array().unwrap().len(), 0);
}

#[test]
fn test_rate_rejects_non_array_input() {
    let dir = TempDir::new().unwrap();
    let reference = write(&dir, "reference.json", REFERENCE);
    let records = write(&dir, "records.json", r#"{"sheetId": "Foo__x__dx__y__master"}"#);

    let output = processor()
        .current_dir(dir.path())
        .args(["--reference-file", reference.as_str(), "rate", records.as_str()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be a JSON array"), "Got: {stderr}");
}

#[test]
fn test_strict_flag_rejects_bad_record() {
    let dir = TempDir::new().unwrap();
    let reference = write(&dir, "reference.json", REFERENCE);
    let records = write(
        &dir,
        "records.json",
        r#"[{"sheetId": "Foo__x__dx__y__legendary", "achievementRate": 99.2}]"#
    );

    let output = processor()
        .current_dir(dir.path())
        .args(["--reference-file", reference.as_str(), "--strict", "rate", records.as_str()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("legendary"));
}

#[test]
fn test_render_writes_svg() {
    let dir = TempDir::new().unwrap();
    let reference = write(&dir, "reference.json", REFERENCE);
    let records = write(
        &dir,
        "records.json",
        r#"[{"sheetId": "Foo__x__dx__y__master", "achievementRate": 99.2}]"#
    );
    let chart = dir.path().join("chart.svg");

    let output = processor()
        .current_dir(dir.path())
        .args(["--reference-file", reference.as_str(), "render", records.as_str(), "--no-cover-art", "--output"])
        .arg(&chart)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let svg = fs::read_to_string(&chart).unwrap();
    assert!(svg.contains(">278</text>"));
    assert_eq!(svg.matches("NO DATA").count(), 49);
}

#[test]
fn test_missing_reference_file_fails() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.json", "[]");
    let missing = Path::new("does-not-exist.json");

    let output = processor()
        .current_dir(dir.path())
        .arg("--reference-file")
        .arg(missing)
        .args(["rate", records.as_str()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.json"));
}
