//! Command workflow orchestration
//!
//! Each workflow takes plain argument structs rather than clap types, so it
//! can be called programmatically and tested without spawning the binary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::boundary::ReleaseWarning;
use crate::config::Config;
use crate::domain::{MapData, Point};
use crate::parser::RoborockMapParser;
use crate::release::{self, StampOutcome};

/// Arguments for decoding a map file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseWorkflowArgs {
    pub input: PathBuf,

    /// Treat the input as uncompressed even if it looks like gzip
    pub raw: bool,

    /// Write the rendered floor image here
    pub image_out: Option<PathBuf>,

    /// Override the configured image scale
    pub scale: Option<f64>,
}

/// Result of a successful parse workflow
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub map: MapData,
    pub image_written: Option<PathBuf>,
}

/// Decode a map file and optionally render its image to PNG.
pub fn run_parse_workflow(args: &ParseWorkflowArgs, config: &Config) -> Result<ParseResult> {
    let mut config = config.clone();
    if let Some(scale) = args.scale {
        config.image.scale = scale;
        config.validate()?;
    }

    let map = decode_file(args, &config)?;

    let image_written = match &args.image_out {
        Some(path) => {
            let image = map
                .image
                .as_ref()
                .and_then(|data| data.image.as_ref())
                .context("map has no image to render")?;
            image
                .save_png(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote map image");
            Some(path.clone())
        }
        None => None,
    };

    Ok(ParseResult { map, image_written })
}

/// Look up the room under a map coordinate.
pub fn run_room_at_workflow(
    args: &ParseWorkflowArgs,
    config: &Config,
    x: f64,
    y: f64,
) -> Result<Option<u8>> {
    let map = decode_file(args, config)?;
    if !map.has_image() {
        anyhow::bail!("map has no image; rooms cannot be located");
    }
    Ok(map.room_at(&Point::new(x, y)))
}

fn decode_file(args: &ParseWorkflowArgs, config: &Config) -> Result<MapData> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let parser = RoborockMapParser::from_config(config);

    let map = if args.raw {
        parser.parse(&bytes)
    } else {
        parser.decode(&bytes)
    };
    map.with_context(|| format!("failed to decode {}", args.input.display()))
}

/// Arguments for the release workflows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    pub tag: Option<String>,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

/// Normalized version plus any warning about its shape
#[derive(Debug, Clone, PartialEq)]
pub struct VersionResult {
    pub tag: String,
    pub version: String,
    pub warning: Option<ReleaseWarning>,
}

pub fn run_version_workflow(args: &ReleaseWorkflowArgs, config: &Config) -> Result<VersionResult> {
    let tag = release::resolve_tag(args.tag.as_deref(), &config.release)?;
    let (version, warning) = release::release_version(&tag);
    Ok(VersionResult {
        tag,
        version: version.to_string(),
        warning,
    })
}

/// Derive the version and stamp it into the manifest.
pub fn run_stamp_workflow(
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<(VersionResult, StampOutcome)> {
    let version = run_version_workflow(args, config)?;
    let manifest = args
        .manifest
        .clone()
        .unwrap_or_else(|| config.release.manifest.clone());

    let outcome = release::stamp_manifest(&manifest, &version.version, args.dry_run)
        .with_context(|| format!("failed to stamp {}", manifest.display()))?;
    Ok((version, outcome))
}
