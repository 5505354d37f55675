//! CLI integration tests: run the built `strata` binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::integration::write_file;

fn strata(workspace: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_strata");
    Command::new(bin)
        .env("XDG_CONFIG_HOME", workspace.join("xdg"))
        .env("HOME", workspace.join("home"))
        .env_remove("STRATA_LOG")
        .arg("--workspace")
        .arg(workspace)
        .arg("--log-level")
        .arg("off")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "strata should succeed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn workspace_with_overrides() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir.path().join("overrides/projects/alpha.json"),
        r#"{"RenderSettings": {"image_format": "png"}}"#,
    );
    dir
}

#[test]
fn test_resolve_path_for_project() {
    let ws = workspace_with_overrides();
    let out = strata(
        ws.path(),
        &["resolve", "--project", "alpha", "--path", "RenderSettings.image_format"],
    );
    assert_eq!(stdout(&out), "\"png\"");

    let out = strata(ws.path(), &["resolve", "--path", "RenderSettings.image_format"]);
    assert_eq!(stdout(&out), "\"exr\"");
}

#[test]
fn test_resolve_whole_tree_is_json() {
    let ws = TempDir::new().unwrap();
    let out = strata(ws.path(), &["resolve"]);
    let tree: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(tree["RenderSettings"]["aov_separator"], "underscore");
}

#[test]
fn test_plugins_json_and_table() {
    let ws = TempDir::new().unwrap();
    let out = strata(ws.path(), &["plugins", "--format", "json"]);
    let controls: Vec<serde_json::Value> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(controls.len(), 19);
    assert_eq!(controls[0]["name"], "ValidateCameraZeroKeyframe");

    let out = strata(ws.path(), &["plugins"]);
    assert!(stdout(&out).contains("ExtractThumbnail"));
}

#[test]
fn test_preset_selection() {
    let ws = TempDir::new().unwrap();
    let out = strata(
        ws.path(),
        &["preset", "--plugin", "ExtractPlayblast", "--key", "layout"],
    );
    let preset: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(preset["name"], "default");
    assert_eq!(preset["matched"], "default");

    let out = strata(
        ws.path(),
        &["preset", "--plugin", "ExtractThumbnail", "--key", "animation"],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No preset matching"));
}

#[test]
fn test_describe_and_explain() {
    let ws = workspace_with_overrides();
    let out = strata(ws.path(), &["describe", "RenderSettings.aov_separator"]);
    assert!(stdout(&out).starts_with("RenderSettings.aov_separator: enum[dash|underscore|dot]"));

    let out = strata(
        ws.path(),
        &["explain", "--project", "alpha", "RenderSettings.image_format"],
    );
    assert_eq!(
        stdout(&out),
        "RenderSettings.image_format = \"png\" (from project:alpha)"
    );
}

#[test]
fn test_check_documents() {
    let ws = TempDir::new().unwrap();
    let good = ws.path().join("good.toml");
    let bad = ws.path().join("bad.json");
    write_file(&good, "[RenderSettings]\nimage_format = \"tif\"\n");
    write_file(&bad, r#"{"RenderSettings": {"image_format": 3}}"#);

    let out = strata(ws.path(), &["check", good.to_str().unwrap()]);
    assert!(stdout(&out).starts_with("OK:"));

    let out = strata(ws.path(), &["check", bad.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("RenderSettings.image_format"));
}

#[test]
fn test_invalid_override_directory_fails() {
    let ws = TempDir::new().unwrap();
    write_file(
        &ws.path().join("overrides/studio.json"),
        r#"{"RenderSettings": {"nope": true}}"#,
    );
    let out = strata(ws.path(), &["resolve"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("RenderSettings.nope"));
}

#[test]
fn test_overrides_flag_and_workspace_config() {
    let ws = TempDir::new().unwrap();
    write_file(
        &ws.path().join("settings/studio.json"),
        r#"{"set_frames_startup": false}"#,
    );
    write_file(
        &ws.path().join("strata.toml"),
        "[overrides]\nroot = \"settings\"\n",
    );
    let out = strata(ws.path(), &["resolve", "--path", "set_frames_startup"]);
    assert_eq!(stdout(&out), "false");

    let elsewhere = TempDir::new().unwrap();
    let out = strata(
        ws.path(),
        &[
            "--overrides",
            elsewhere.path().to_str().unwrap(),
            "resolve",
            "--path",
            "set_frames_startup",
        ],
    );
    assert_eq!(stdout(&out), "true");
}
