//! Hosts handler configuration
//!
//! This module provides the typed configuration consumed by the handler
//! and the refresh loop. It is the output contract of the external
//! directive parser: a source path, an ordered set of authoritative
//! origins, the fallthrough flag, and optional inline host entries.

use crate::error::{HostsError, Result};
use crate::reload::RELOAD_INTERVAL;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default hosts file path
pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Configuration for a hosts handler instance
///
/// Immutable once handed to [`HostsFile`](crate::HostsFile) and
/// [`HostsHandler`](crate::HostsHandler).
#[derive(Debug, Clone)]
pub struct HostsConfig {
    /// Path of the hosts file to serve and watch
    pub path: PathBuf,

    /// Ordered set of normalized domain suffixes this handler is
    /// authoritative for; empty means authoritative for every query
    pub origins: Vec<String>,

    /// On no-match, delegate to the next handler instead of answering
    /// "name not found"
    pub fallthrough: bool,

    /// Literal hosts-file lines appended to every rebuild of the table;
    /// cannot be combined with fallthrough
    pub inline: Vec<String>,

    /// Cadence of the background refresh loop
    pub reload_interval: Duration,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HOSTS_PATH),
            origins: Vec::new(),
            fallthrough: false,
            inline: Vec::new(),
            reload_interval: RELOAD_INTERVAL,
        }
    }
}

impl HostsConfig {
    /// Create a config serving the given hosts file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add an origin this handler is authoritative for.
    ///
    /// The origin is normalized (lowercase, trailing dot) on insert.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origins.push(normalize_origin(origin));
        self
    }

    /// Add several origins at once, in order.
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for origin in origins {
            self.origins.push(normalize_origin(origin.as_ref()));
        }
        self
    }

    /// Enable or disable fallthrough to the next handler.
    pub fn with_fallthrough(mut self, enabled: bool) -> Self {
        self.fallthrough = enabled;
        self
    }

    /// Append a literal hosts-file line served alongside file content.
    pub fn with_inline_line(mut self, line: impl Into<String>) -> Self {
        self.inline.push(line.into());
        self
    }

    /// Override the refresh cadence (defaults to [`RELOAD_INTERVAL`]).
    pub fn with_reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    /// Validate the configuration at setup time.
    ///
    /// A missing hosts file or a directory in its place is a warning, not
    /// an error: the service starts and serves an empty (or inline-only)
    /// table until the file appears. Any other access failure, an
    /// unusable origin, or inline entries combined with fallthrough
    /// prevent startup.
    pub fn validate(&self) -> Result<()> {
        if self.fallthrough && !self.inline.is_empty() {
            return Err(HostsError::Config(
                "inline host entries cannot be combined with fallthrough".to_string(),
            ));
        }

        for origin in &self.origins {
            if origin != "." && origin.trim_matches('.').is_empty() {
                return Err(HostsError::InvalidOrigin {
                    origin: origin.clone(),
                    reason: "empty after normalization".to_string(),
                });
            }
            if origin.contains(char::is_whitespace) {
                return Err(HostsError::InvalidOrigin {
                    origin: origin.clone(),
                    reason: "contains whitespace".to_string(),
                });
            }
        }

        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => {
                warn!(path = %self.path.display(), "hosts file is a directory");
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "hosts file does not exist");
            }
            Err(e) => {
                return Err(HostsError::SourceAccess {
                    path: self.path.clone(),
                    source: e,
                });
            }
        }

        Ok(())
    }
}

/// Normalize an origin to a lowercase domain suffix with one trailing dot.
///
/// The root origin `.` stays as-is and matches every name.
pub fn normalize_origin(origin: &str) -> String {
    let trimmed = origin.trim().trim_end_matches('.').to_ascii_lowercase();
    if trimmed.is_empty() {
        return ".".to_string();
    }
    format!("{}.", trimmed)
}
