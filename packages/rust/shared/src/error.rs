//! Error types for mdlex.
//!
//! Library crates use [`MdlexError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mdlex operations.
#[derive(Debug, thiserror::Error)]
pub enum MdlexError {
    /// A search was attempted before any index was built or loaded.
    #[error("index is not loaded")]
    IndexNotLoaded,

    /// Filesystem I/O error on a source document or index artifact.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The index artifact could not be decoded into a valid tree and dictionary.
    #[error("invalid index file: {message}")]
    Format { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MdlexError>;

impl MdlexError {
    /// Create a format error from any displayable message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from a missing or unreadable file rather than bad content.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = MdlexError::format("schema_version 99 not supported");
        assert_eq!(
            err.to_string(),
            "invalid index file: schema_version 99 not supported"
        );

        assert_eq!(MdlexError::IndexNotLoaded.to_string(), "index is not loaded");
    }

    #[test]
    fn io_is_distinguished_from_format() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(MdlexError::io("/tmp/none.idx", missing).is_io());
        assert!(!MdlexError::format("truncated").is_io());
    }
}
