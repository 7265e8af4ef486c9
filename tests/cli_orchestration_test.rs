mod common;

use std::env;
use std::fs;

use roborock_map::boundary::ReleaseWarning;
use roborock_map::cli::orchestration::{
    run_parse_workflow, run_room_at_workflow, run_stamp_workflow, run_version_workflow,
    ParseWorkflowArgs, ReleaseWorkflowArgs,
};
use roborock_map::config::{Config, ReleaseConfig};
use serial_test::serial;
use tempfile::TempDir;

const TEST_TAG_ENV: &str = "ROBOROCK_MAP_TEST_TAG";

fn write_map(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn release_config() -> Config {
    Config {
        release: ReleaseConfig {
            tag_env: TEST_TAG_ENV.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_parse_workflow_gzip_with_image() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.gz", &common::full_map().build_gz());
    let image_out = dir.path().join("map.png");

    let args = ParseWorkflowArgs {
        input,
        image_out: Some(image_out.clone()),
        ..Default::default()
    };
    let result = run_parse_workflow(&args, &Config::default()).unwrap();

    assert_eq!(result.map.vacuum_room, Some(17));
    assert_eq!(result.image_written, Some(image_out.clone()));
    let png = fs::read(&image_out).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_parse_workflow_raw_input() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.bin", &common::full_map().build());

    let args = ParseWorkflowArgs {
        input,
        raw: true,
        ..Default::default()
    };
    let result = run_parse_workflow(&args, &Config::default()).unwrap();
    assert!(result.map.is_valid);
    assert!(result.image_written.is_none());
}

#[test]
fn test_parse_workflow_truncated_input() {
    let dir = TempDir::new().unwrap();
    let mut raw = common::full_map().build();
    raw.truncate(raw.len() - 5);
    let input = write_map(&dir, "map.bin", &raw);

    let args = ParseWorkflowArgs {
        input,
        raw: true,
        ..Default::default()
    };
    let err = run_parse_workflow(&args, &Config::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to decode"));
}

#[test]
fn test_parse_workflow_scale_override() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.gz", &common::full_map().build_gz());

    let args = ParseWorkflowArgs {
        input: input.clone(),
        scale: Some(3.0),
        ..Default::default()
    };
    let result = run_parse_workflow(&args, &Config::default()).unwrap();
    let image = result.map.image.unwrap().image.unwrap();
    assert_eq!((image.width(), image.height()), (12, 9));

    let args = ParseWorkflowArgs {
        input,
        scale: Some(-1.0),
        ..Default::default()
    };
    assert!(run_parse_workflow(&args, &Config::default()).is_err());
}

#[test]
fn test_parse_workflow_image_requested_without_image() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.bin", &common::MapBuilder::new().digest().build());

    let args = ParseWorkflowArgs {
        input,
        image_out: Some(dir.path().join("none.png")),
        ..Default::default()
    };
    let err = run_parse_workflow(&args, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("no image"));
}

#[test]
fn test_parse_workflow_missing_file() {
    let dir = TempDir::new().unwrap();
    let args = ParseWorkflowArgs {
        input: dir.path().join("absent.gz"),
        ..Default::default()
    };
    let err = run_parse_workflow(&args, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn test_room_at_workflow() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.gz", &common::full_map().build_gz());
    let args = ParseWorkflowArgs {
        input,
        ..Default::default()
    };

    let config = Config::default();
    assert_eq!(
        run_room_at_workflow(&args, &config, 1100.0, 550.0).unwrap(),
        Some(17)
    );
    assert_eq!(
        run_room_at_workflow(&args, &config, 1060.0, 510.0).unwrap(),
        Some(16)
    );
    assert_eq!(run_room_at_workflow(&args, &config, 1000.0, 600.0).unwrap(), None);
    assert_eq!(run_room_at_workflow(&args, &config, -500.0, 0.0).unwrap(), None);
}

#[test]
fn test_room_at_workflow_without_image() {
    let dir = TempDir::new().unwrap();
    let input = write_map(&dir, "map.bin", &common::MapBuilder::new().digest().build());
    let args = ParseWorkflowArgs {
        input,
        ..Default::default()
    };
    assert!(run_room_at_workflow(&args, &Config::default(), 0.0, 0.0).is_err());
}

#[test]
fn test_version_workflow_explicit_tag() {
    let args = ReleaseWorkflowArgs {
        tag: Some("V1.2.3".to_string()),
        ..Default::default()
    };
    let result = run_version_workflow(&args, &release_config()).unwrap();
    assert_eq!(result.tag, "V1.2.3");
    assert_eq!(result.version, "1.2.3");
    assert!(result.warning.is_none());
}

#[test]
#[serial]
fn test_version_workflow_from_env() {
    env::set_var(TEST_TAG_ENV, "v0.4.0-rc.1");
    let result = run_version_workflow(&ReleaseWorkflowArgs::default(), &release_config());
    env::remove_var(TEST_TAG_ENV);

    let result = result.unwrap();
    assert_eq!(result.version, "0.4.0-rc.1");
    assert!(result.warning.is_none());
}

#[test]
#[serial]
fn test_version_workflow_without_tag() {
    env::remove_var(TEST_TAG_ENV);
    let err = run_version_workflow(&ReleaseWorkflowArgs::default(), &release_config())
        .unwrap_err();
    assert!(err.to_string().contains(TEST_TAG_ENV));
}

#[test]
fn test_version_workflow_non_semver_warns() {
    let args = ReleaseWorkflowArgs {
        tag: Some("release-7".to_string()),
        ..Default::default()
    };
    let result = run_version_workflow(&args, &release_config()).unwrap();
    assert_eq!(result.version, "release-7");
    assert!(matches!(
        result.warning,
        Some(ReleaseWarning::NotSemver { .. })
    ));
}

#[test]
fn test_stamp_workflow_writes_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(
        &manifest,
        "[tool.poetry]\nname = \"demo\"\nversion = \"0.0.0\"\n",
    )
    .unwrap();

    let args = ReleaseWorkflowArgs {
        tag: Some("v1.0.0".to_string()),
        manifest: Some(manifest.clone()),
        dry_run: false,
    };
    let (version, outcome) = run_stamp_workflow(&args, &release_config()).unwrap();

    assert_eq!(version.version, "1.0.0");
    assert_eq!(outcome.previous, "0.0.0");
    assert!(outcome.written);
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "[tool.poetry]\nname = \"demo\"\nversion = \"1.0.0\"\n"
    );

    // Stamping the same version again leaves the file alone
    let (_, outcome) = run_stamp_workflow(&args, &release_config()).unwrap();
    assert!(!outcome.written);
    assert_eq!(outcome.previous, "1.0.0");
}

#[test]
fn test_stamp_workflow_dry_run() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    let original = "[project]\nversion = \"0.1.0\"\n";
    fs::write(&manifest, original).unwrap();

    let args = ReleaseWorkflowArgs {
        tag: Some("v0.2.0".to_string()),
        manifest: Some(manifest.clone()),
        dry_run: true,
    };
    let (_, outcome) = run_stamp_workflow(&args, &release_config()).unwrap();

    assert!(!outcome.written);
    assert_eq!(outcome.version, "0.2.0");
    assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
}

#[test]
fn test_stamp_workflow_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let args = ReleaseWorkflowArgs {
        tag: Some("v1.0.0".to_string()),
        manifest: Some(dir.path().join("absent.toml")),
        dry_run: false,
    };
    let err = run_stamp_workflow(&args, &release_config()).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to stamp"));
}
