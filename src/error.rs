//! Error types for the hosts handler
//!
//! This module provides error types for setup-time configuration problems
//! and handler-chain contract violations.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for hosts operations
#[derive(Debug, Error)]
pub enum HostsError {
    /// Invalid configuration supplied at setup time
    #[error("configuration error: {0}")]
    Config(String),

    /// An origin string that cannot be normalized into a domain suffix
    #[error("invalid origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// Hosts file exists but cannot be accessed
    #[error("unable to access hosts file {}: {source}", path.display())]
    SourceAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fallthrough requested but the chain has no next handler
    #[error("no next handler in chain for {0}")]
    NoNextHandler(String),
}

/// Result type for hosts operations
pub type Result<T> = std::result::Result<T, HostsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HostsError::Config("inline entries require fallthrough disabled".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: inline entries require fallthrough disabled"
        );

        let err = HostsError::InvalidOrigin {
            origin: " ".to_string(),
            reason: "empty after normalization".to_string(),
        };
        assert!(err.to_string().contains("invalid origin"));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = HostsError::SourceAccess {
            path: PathBuf::from("/etc/hosts"),
            source: io_err,
        };
        assert!(err.to_string().contains("unable to access hosts file"));

        let err = HostsError::NoNextHandler("foo.example.org.".to_string());
        assert_eq!(err.to_string(), "no next handler in chain for foo.example.org.");
    }
}
