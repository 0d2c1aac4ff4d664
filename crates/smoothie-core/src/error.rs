//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Chat Client Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to build HTTP client: {reason}")]
    ClientInit { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Asset Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to copy asset {path}: {reason}")]
    AssetCopy { path: PathBuf, reason: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn client_init(reason: impl Into<String>) -> Self {
        Self::ClientInit {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn asset_copy(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::AssetCopy {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ClientInit { .. } | Error::ConfigInvalid { .. } | Error::Url(_)
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::client_init("no TLS backend");
        assert_eq!(err.to_string(), "Failed to build HTTP client: no TLS backend");

        let err = Error::asset_copy("/tmp/a.jpg", "denied");
        assert!(err.to_string().contains("/tmp/a.jpg"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_url() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::client_init("tls").is_fatal());
        assert!(Error::config_invalid("bad base url").is_fatal());
        assert!(!Error::config("unreadable").is_fatal());
        assert!(!Error::asset_copy("a.jpg", "denied").is_fatal());
    }

    #[test]
    fn test_result_ext_context_preserves_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "nope",
        ));
        let err = result.context("reading config").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
