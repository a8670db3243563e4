//! Mayfly Hosts
//!
//! This crate serves static hostname mappings (the classic `/etc/hosts`
//! model) as one link in a chain of DNS query handlers, with hot reload:
//! a background task re-reads the source file on a fixed cadence and
//! atomically swaps in a rebuilt table when the content changed, without
//! blocking concurrent lookups.
//!
//! # Architecture
//!
//! ```text
//! hosts file ──parse──▶ HostsMap ──store──▶ TableHolder
//!      ▲                                        │ lock-free snapshot
//!      └── HostsFile::run (5s tick, watch-channel shutdown)
//!                                               ▼
//! query ──▶ HostsHandler ──▶ answer / NODATA / NXDOMAIN
//!                │ no match + fallthrough
//!                ▼
//!           next DnsHandler in the chain
//! ```
//!
//! Every query resolves against a single immutable snapshot: a
//! concurrent reload never shows a lookup a half-built table, and a
//! source outage keeps the previous table serving.
//!
//! # Example
//!
//! ```ignore
//! use mayfly_hosts::{DnsHandler, DnsQuery, HostsConfig, HostsFile, HostsHandler};
//! use hickory_proto::rr::{Name, RecordType};
//! use std::str::FromStr;
//! use std::sync::Arc;
//!
//! let config = HostsConfig::new("/etc/hosts")
//!     .with_origin("example.org")
//!     .with_fallthrough(true);
//! config.validate()?;
//!
//! let hosts = Arc::new(HostsFile::new(&config));
//! let handler = HostsHandler::new(&config, hosts.holder(), Some(next_handler));
//!
//! // Start hook: spawn the refresh loop. Stop hook: flip the channel once.
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let reload = hosts.clone();
//! tokio::spawn(async move { reload.run(shutdown_rx).await });
//!
//! let query = DnsQuery::new(Name::from_str("web.example.org.")?, RecordType::A);
//! let response = handler.handle(&query).await?;
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod hostsfile;
pub mod reload;
pub mod table;

pub use config::{normalize_origin, HostsConfig, DEFAULT_HOSTS_PATH};
pub use error::{HostsError, Result};
pub use handler::{DnsHandler, DnsQuery, DnsResponse, HostsHandler, HOSTS_TTL};
pub use hostsfile::{normalize_name, reverse_address, Fingerprint, HostsMap};
pub use reload::{HostsFile, RELOAD_INTERVAL};
pub use table::TableHolder;
