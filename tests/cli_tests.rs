//! CLI integration tests for the pxs binary
//!
//! These tests verify end-to-end behavior of the CLI by running the binary
//! against settings files in a temp directory and checking exit codes and
//! output.

use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Get the path to the pxs binary
fn pxs_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pxs"))
}

fn run_pxs(dir: &Path, args: &[&str]) -> Output {
    Command::new(pxs_binary())
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pxs")
}

/// 3x2 picture: a white background with a red bar along the bottom row
fn write_project(dir: &Path, settings_extra: &str) {
    let image = RgbImage::from_fn(3, 2, |_, y| {
        if y == 1 {
            Rgb([200, 10, 10])
        } else {
            Rgb([250, 250, 250])
        }
    });
    image.save(dir.join("art.png")).expect("should save test image");

    let settings = format!(
        r##"{{
            "file_path": "art.png",
            "pixel_size": 16,
            "max_length_command": -1,
            {}
            "colors": {{"minecraft:white_concrete": "#FFFFFF", "minecraft:red_concrete": "red"}}
        }}"##,
        settings_extra
    );
    fs::write(dir.join("settings.json"), settings).expect("should write settings");
}

#[test]
fn test_build_prints_commands() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), "");

    let output = run_pxs(temp.path(), &["build"]);
    assert!(output.status.success(), "Build failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("summon block_display ~ ~ ~ {Passengers:["));
    assert!(lines[0].contains("Name:\"minecraft:white_concrete\""));
    assert!(lines[0].contains("Name:\"minecraft:red_concrete\""));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("white_concrete: x1"));
    assert!(stderr.contains("red_concrete: x1"));
    assert!(!temp.path().join("output").exists());
}

#[test]
fn test_build_writes_files() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), r#""write_to_file": true, "output_dir": "out","#);
    fs::create_dir(temp.path().join("out")).unwrap();
    fs::write(temp.path().join("out").join("message-9.txt"), "stale").unwrap();

    let output = run_pxs(temp.path(), &["build", "--quiet", "--max-length", "300"]);
    assert!(output.status.success(), "Build failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let out = temp.path().join("out");
    assert!(!out.join("message-9.txt").exists());
    assert!(out.join("message-0.txt").exists());
    assert!(out.join("message-1.txt").exists());
    let first = fs::read_to_string(out.join("message-0.txt")).unwrap();
    assert!(first.ends_with("]}"));
}

#[test]
fn test_build_with_explicit_config() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), "");
    let elsewhere = TempDir::new().expect("should create temp dir");

    let config = temp.path().join("settings.json");
    let output = run_pxs(
        elsewhere.path(),
        &["build", "--config", config.to_str().unwrap(), "--rotate", "0", "-90", "0"],
    );
    assert!(output.status.success(), "Build failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}

#[test]
fn test_build_without_settings_fails() {
    let temp = TempDir::new().expect("should create temp dir");
    let output = run_pxs(temp.path(), &["build", "--config", "nope.json"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_build_invalid_settings_exit_code() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), "");

    let output = run_pxs(temp.path(), &["build", "--pixel-size", "0"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pixel_size"));
}

#[test]
fn test_build_missing_image_exit_code() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), "");
    fs::remove_file(temp.path().join("art.png")).unwrap();

    let output = run_pxs(temp.path(), &["build"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_regions_json() {
    let temp = TempDir::new().expect("should create temp dir");
    write_project(temp.path(), "");

    let output = run_pxs(temp.path(), &["regions", "--json"]);
    assert!(output.status.success(), "Regions failed: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("regions output should be JSON");
    assert_eq!(report["width"], 3);
    assert_eq!(report["height"], 2);
    assert_eq!(report["background"], "minecraft:white_concrete");

    // The red bar is grid row 0 after the vertical flip
    let regions = report["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0]["label"], "minecraft:red_concrete");
    assert_eq!(regions[0]["y0"], 0);
    assert_eq!(regions[0]["x0"], 0);
    assert_eq!(regions[0]["x1"], 2);
}

#[test]
fn test_init_creates_settings() {
    let temp = TempDir::new().expect("should create temp dir");

    let output = run_pxs(temp.path(), &["init"]);
    assert!(output.status.success());
    let written = fs::read_to_string(temp.path().join("settings.json")).unwrap();
    assert!(written.contains("minecraft:white_concrete"));

    let again = run_pxs(temp.path(), &["init"]);
    assert_eq!(again.status.code(), Some(2));

    let toml = run_pxs(temp.path(), &["init", "pxs.toml"]);
    assert!(toml.status.success());
    assert!(temp.path().join("pxs.toml").exists());
}
