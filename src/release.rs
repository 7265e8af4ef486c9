//! Release tag handling: resolve the tag, derive the package version, and
//! stamp it into a manifest.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::boundary::ReleaseWarning;
use crate::config::ReleaseConfig;
use crate::domain::ReleaseVersion;
use crate::error::{MapError, Result};

/// Pick the release tag from the explicit argument or the configured
/// environment variable.
pub fn resolve_tag(explicit: Option<&str>, config: &ReleaseConfig) -> Result<String> {
    if let Some(tag) = explicit {
        if tag.is_empty() {
            return Err(MapError::version("release tag must not be empty"));
        }
        return Ok(tag.to_string());
    }

    match env::var(&config.tag_env) {
        Ok(tag) if !tag.is_empty() => {
            debug!(var = %config.tag_env, tag = %tag, "release tag from environment");
            Ok(tag)
        }
        _ => Err(MapError::version(format!(
            "no release tag given and ${} is not set",
            config.tag_env
        ))),
    }
}

/// Derive the package version for a tag.
///
/// The version is returned even when it is not valid semver; the warning
/// says so.
pub fn release_version(tag: &str) -> (ReleaseVersion, Option<ReleaseWarning>) {
    let version = ReleaseVersion::from_tag(tag);
    let warning = match version.semver() {
        Ok(_) => None,
        Err(e) => Some(ReleaseWarning::NotSemver {
            tag: tag.to_string(),
            version: version.to_string(),
            reason: e.to_string(),
        }),
    };
    (version, warning)
}

/// Result of stamping a version into a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct StampOutcome {
    pub manifest: PathBuf,
    pub previous: String,
    pub version: String,
    /// False for dry runs and when the version was already current
    pub written: bool,
}

/// Replace the first `version = "..."` value in manifest text.
///
/// Returns the new text and the previous version.
pub fn stamp_contents(contents: &str, version: &str) -> Result<(String, String)> {
    let re = Regex::new(r#"(?m)^(\s*version\s*=\s*)"([^"]*)""#)
        .map_err(|e| MapError::manifest(e.to_string()))?;
    let caps = re
        .captures(contents)
        .ok_or_else(|| MapError::manifest("no `version = \"...\"` line found"))?;

    let previous = caps[2].to_string();
    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let replacement = format!("{}\"{}\"", &caps[1], version);

    let mut out = String::with_capacity(contents.len() + version.len());
    out.push_str(&contents[..whole.start]);
    out.push_str(&replacement);
    out.push_str(&contents[whole.end..]);
    Ok((out, previous))
}

/// Stamp `version` into the manifest at `path`.
pub fn stamp_manifest(path: &Path, version: &str, dry_run: bool) -> Result<StampOutcome> {
    let contents = fs::read_to_string(path).map_err(|e| {
        MapError::manifest(format!("cannot read {}: {}", path.display(), e))
    })?;
    let (updated, previous) = stamp_contents(&contents, version)?;

    let changed = updated != contents;
    let written = changed && !dry_run;
    if written {
        fs::write(path, updated)?;
        info!(manifest = %path.display(), from = %previous, to = %version, "stamped version");
    }

    Ok(StampOutcome {
        manifest: path.to_path_buf(),
        previous,
        version: version.to_string(),
        written,
    })
}
