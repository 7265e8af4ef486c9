use thiserror::Error;

/// Unified error type for roborock-map operations
#[derive(Error, Debug)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Truncated map data: need {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Malformed map data: {0}")]
    Malformed(String),

    #[error("Decompression failed: {0}")]
    Decompress(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Convenience type alias for Results in roborock-map
pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MapError::Config(msg.into())
    }

    /// Create a malformed-data error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        MapError::Malformed(msg.into())
    }

    pub fn decompress(msg: impl Into<String>) -> Self {
        MapError::Decompress(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        MapError::Image(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MapError::Version(msg.into())
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        MapError::Manifest(msg.into())
    }

    pub(crate) fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        MapError::Truncated {
            offset,
            needed,
            available,
        }
    }
}
