//! End-to-end runs of the `vui-source` binary against the demo project

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn site_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("example/vui-site")
}

/// Run the binary with an isolated config directory and no mode overrides
fn run(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vui-source"))
        .arg("--root")
        .arg(site_root())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("VUI_SOURCE_ENV")
        .env_remove("NODE_ENV")
        .env_remove("VUI_SOURCE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_usage_command() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["usage", "Skeleton"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(
        r#"<Skeleton width="100%" height="1rem" radius="md" animation="pulse" count={1} className="" />"#
    ));
}

#[test]
fn test_props_json_command() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["props", "Blur Text", "--json"]);
    assert!(output.status.success());

    let info: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(info["componentName"], "BlurText");
    assert_eq!(info["props"][0]["name"], "text");
    assert_eq!(info["props"][0]["optional"], false);
}

#[test]
fn test_production_flag_without_map() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--production", "source", "Skeleton"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Component source not available"));
}

#[test]
fn test_check_command_fails_on_placeholders() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["check"]);
    assert!(!output.status.success());

    let text = stdout(&output);
    assert!(text.contains("ok       Components / Skeleton"));
    assert!(text.contains("missing  AI Components / Ghost Writer"));
    assert!(text.contains("5 of 6 components resolved"));
}

#[test]
fn test_build_map_to_custom_output() {
    let home = TempDir::new().unwrap();
    let out_path = home.path().join("map.json");
    let output = run(
        home.path(),
        &["build-map", "--output", out_path.to_str().unwrap()],
    );
    assert!(output.status.success());

    let map: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert!(map["generated_at"].is_string());
    assert!(map["components"]["Skeleton"].is_string());
}

#[test]
fn test_invalid_log_level() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--log-level", "loud", "list"]);
    assert!(!output.status.success());
}
