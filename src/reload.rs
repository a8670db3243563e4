//! Background refresh of the hosts table
//!
//! [`HostsFile`] owns the source path and drives the shared
//! [`TableHolder`]: one immediate load on startup, then a fixed-cadence
//! loop that re-stats the file and rebuilds the table only when the
//! content fingerprint changed. The loop runs until its shutdown signal
//! fires; read failures are logged and the previous table keeps serving.

use crate::config::HostsConfig;
use crate::hostsfile::{Fingerprint, HostsMap};
use crate::table::TableHolder;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Cadence of the refresh loop
pub const RELOAD_INTERVAL: Duration = Duration::from_secs(5);

/// A hosts file watched for changes and served through a [`TableHolder`].
#[derive(Debug)]
pub struct HostsFile {
    path: PathBuf,
    inline: Vec<String>,
    interval: Duration,
    holder: Arc<TableHolder>,
}

impl HostsFile {
    /// Create a watched hosts file from its configuration.
    ///
    /// The holder starts empty, or with the inline entries already
    /// indexed when any are configured; inline entries are served even
    /// if the source file never becomes readable.
    pub fn new(config: &HostsConfig) -> Self {
        let holder = Arc::new(TableHolder::new());
        if !config.inline.is_empty() {
            holder.store(HostsMap::build("", &config.inline));
        }
        Self {
            path: config.path.clone(),
            inline: config.inline.clone(),
            interval: config.reload_interval,
            holder,
        }
    }

    /// Shared handle to the table this file publishes into.
    pub fn holder(&self) -> Arc<TableHolder> {
        self.holder.clone()
    }

    /// Read the source once and publish a new table if its content changed.
    ///
    /// Synchronous, so the start hook can call it before any query is
    /// accepted. Access failures keep the previous table serving.
    pub fn load_now(&self) {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot stat hosts file, keeping previous table");
                return;
            }
        };
        if meta.is_dir() {
            warn!(path = %self.path.display(), "hosts file is a directory, keeping previous table");
            return;
        }

        let fingerprint = Fingerprint::from_metadata(&meta);
        if self.holder.fingerprint() == Some(fingerprint) {
            return;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read hosts file, keeping previous table");
                return;
            }
        };

        let mut map = HostsMap::build(&content, &self.inline);
        map.fingerprint = Some(fingerprint);
        let entries = map.len();
        self.holder.store(map);
        debug!(path = %self.path.display(), entries, "hosts table reloaded");
    }

    /// Run the refresh loop until the shutdown signal fires.
    ///
    /// Performs one immediate load on entry, then races the reload tick
    /// against the shutdown signal. After shutdown is observed no further
    /// table replacements happen.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        self.load_now();

        let mut ticker = tokio::time::interval(self.interval);
        // interval fires immediately once; the entry load covered that
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.load_now();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(path = %self.path.display(), "hosts reload loop stopping");
                        break;
                    }
                }
            }
        }
    }
}
