// tests/integration_test.rs
mod common;

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

struct Cli {
    dir: TempDir,
}

impl Cli {
    /// Each run uses an empty config file so user settings do not leak in.
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Cli { dir }
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.dir.path().join("config.toml");
        Command::new(env!("CARGO_BIN_EXE_roborock-map"))
            .arg("--config")
            .arg(&config)
            .args(args)
            .env_remove("RELEASE_TAG")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute command")
    }

    fn write(&self, name: &str, bytes: &[u8]) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path.to_str().unwrap().to_string()
    }
}

#[test]
fn test_roborock_map_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_roborock-map"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("roborock-map"));
    assert!(stdout.contains("Decode and render Roborock vacuum map snapshots"));
    assert!(stdout.contains("release-version"));
}

#[test]
fn test_release_version_from_argument() {
    let cli = Cli::new();
    let output = cli.run(&["release-version", "V1.2.3"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1.2.3\n");
}

#[test]
fn test_release_version_from_environment() {
    let cli = Cli::new();
    let output = Command::new(env!("CARGO_BIN_EXE_roborock-map"))
        .arg("--config")
        .arg(cli.dir.path().join("config.toml"))
        .arg("release-version")
        .env("RELEASE_TAG", "v2.0.1")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "2.0.1\n");
}

#[test]
fn test_release_version_without_tag_fails() {
    let cli = Cli::new();
    let output = cli.run(&["release-version"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("RELEASE_TAG"));
}

#[test]
fn test_release_version_non_semver_warns() {
    let cli = Cli::new();
    let output = cli.run(&["release-version", "nightly"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "nightly\n");
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("not semver"));
}

#[test]
fn test_stamp_command() {
    let cli = Cli::new();
    let manifest = cli.write("pyproject.toml", b"[project]\nversion = \"0.0.0\"\n");

    let output = cli.run(&["stamp", "v3.1.0", "--manifest", &manifest]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "[project]\nversion = \"3.1.0\"\n"
    );
}

#[test]
fn test_parse_json_output() {
    let cli = Cli::new();
    let map = cli.write("map.gz", &common::full_map().build_gz());

    let output = cli.run(&["parse", &map, "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["vacuum_room"], 17);
    assert_eq!(json["header"]["map_index"], 7);
}

#[test]
fn test_parse_summary_and_image() {
    let cli = Cli::new();
    let map = cli.write("map.gz", &common::full_map().build_gz());
    let image = cli.dir.path().join("out.png");

    let output = cli.run(&["parse", &map, "--image", image.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Map #7 (sequence 42)"));
    assert!(stdout.contains("Rooms: 2 [16, 17]"));
    assert!(image.exists());
}

#[test]
fn test_parse_rejects_garbage() {
    let cli = Cli::new();
    let map = cli.write("map.bin", &[0x72, 0x72, 0x00]);

    let output = cli.run(&["parse", &map]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_room_at_command() {
    let cli = Cli::new();
    let map = cli.write("map.bin", &common::full_map().build());

    let output = cli.run(&["room-at", &map, "1100", "550"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "17\n");

    let output = cli.run(&["room-at", &map, "1000", "600"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_room_at_accepts_negative_coordinates() {
    let cli = Cli::new();
    let map = cli.write("map.bin", &common::full_map().build());

    let output = cli.run(&["room-at", &map, "-500", "-0.5"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("No room at (-500, -0.5)"),
        "expected a lookup miss, got: {}",
        stderr
    );
}
