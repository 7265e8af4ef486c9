use std::fmt;

use serde::Serialize;

/// Non-fatal anomalies found while decoding a map snapshot.
/// These are recorded on the map and reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// Block type this parser does not understand
    UnknownBlock {
        block_type: u16,
        header_length: usize,
        data_length: usize,
    },
    /// Mop path block arrived before any path block
    MopPathWithoutPath,
    /// Image block present but has no drawable area
    EmptyImage,
    /// Vacuum position falls outside the image raster
    VacuumOutsideImage,
    /// Snapshot ended without a digest block
    MissingDigest,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnknownBlock {
                block_type,
                header_length,
                data_length,
            } => write!(
                f,
                "Skipped unknown block type {} (header {} bytes, data {} bytes)",
                block_type, header_length, data_length
            ),
            ParseWarning::MopPathWithoutPath => {
                write!(f, "Mop path block found before any path; mop path ignored")
            }
            ParseWarning::EmptyImage => write!(f, "Map image is empty"),
            ParseWarning::VacuumOutsideImage => {
                write!(f, "Vacuum position lies outside the map image")
            }
            ParseWarning::MissingDigest => {
                write!(f, "Map has no digest block and may be incomplete")
            }
        }
    }
}

/// Warnings raised while deriving a release version.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Normalized version is not valid semver; it is used as-is
    NotSemver {
        tag: String,
        version: String,
        reason: String,
    },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NotSemver {
                tag,
                version,
                reason,
            } => write!(
                f,
                "Version '{}' from tag '{}' is not semver ({}); using it unchanged",
                version, tag, reason
            ),
        }
    }
}
