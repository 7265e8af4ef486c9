use std::fmt;

/// Normalize a release tag into a package version.
///
/// Lowercases the tag and removes a single leading `v`. Anything else is
/// passed through untouched, including tags that are not versions at all.
pub fn normalize_version(tag: &str) -> String {
    let lower = tag.to_lowercase();
    match lower.strip_prefix('v') {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// A package version derived from a release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    tag: String,
    version: String,
}

impl ReleaseVersion {
    pub fn from_tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let version = normalize_version(&tag);
        ReleaseVersion { tag, version }
    }

    /// The tag this version was derived from
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// Interpret the normalized version as semver.
    pub fn semver(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.version)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}
