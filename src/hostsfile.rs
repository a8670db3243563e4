//! Hosts file parsing and the in-memory entry table
//!
//! This module provides the line-oriented hosts grammar (`<address>
//! <hostname>...`, `#` comments, blank lines) and [`HostsMap`], the
//! immutable snapshot built from one full parse. Forward lookups are kept
//! split by address family so A and AAAA queries are answered
//! independently; a reverse map answers PTR queries. A map is never
//! mutated after construction; updates are whole-table replacements.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::SystemTime;
use tracing::debug;

/// Identity of the source content a [`HostsMap`] was built from.
///
/// Byte length plus modification time is enough to detect change between
/// refresh ticks without hashing the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    /// Source file length in bytes
    pub size: u64,
    /// Source file modification time
    pub mtime: SystemTime,
}

impl Fingerprint {
    /// Compute the fingerprint from file metadata.
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            mtime: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

/// Immutable snapshot of parsed host entries.
///
/// Address vectors preserve first-seen-in-source order; every match is
/// returned, there is no precedence among addresses for one name.
#[derive(Debug, Default)]
pub struct HostsMap {
    /// Hostname → IPv4 addresses
    name4: HashMap<String, Vec<Ipv4Addr>>,
    /// Hostname → IPv6 addresses
    name6: HashMap<String, Vec<Ipv6Addr>>,
    /// Address → hostnames (for PTR lookups)
    addr: HashMap<IpAddr, Vec<String>>,
    /// Identity of the content this table was built from, if it came
    /// from a file
    pub fingerprint: Option<Fingerprint>,
}

impl HostsMap {
    /// Build a table from raw hosts-file content plus inline entry lines.
    ///
    /// Malformed lines are skipped, never fatal. Inline lines use the same
    /// grammar as file content and are indexed after it, so they are
    /// re-applied on every rebuild.
    pub fn build(content: &str, inline: &[String]) -> Self {
        let mut map = Self::default();
        for line in content.lines().chain(inline.iter().map(String::as_str)) {
            map.parse_line(line);
        }
        map
    }

    fn parse_line(&mut self, line: &str) {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut fields = line.split_whitespace();
        let Some(addr_text) = fields.next() else {
            return;
        };
        let addr = match addr_text.parse::<IpAddr>() {
            Ok(addr) => addr,
            Err(_) => {
                debug!(field = %addr_text, "skipping hosts line with unparseable address");
                return;
            }
        };
        for host in fields {
            let name = normalize_name(host);
            match addr {
                IpAddr::V4(v4) => self.name4.entry(name.clone()).or_default().push(v4),
                IpAddr::V6(v6) => self.name6.entry(name.clone()).or_default().push(v6),
            }
            self.addr.entry(addr).or_default().push(name);
        }
    }

    /// IPv4 addresses for a normalized hostname, first-seen order.
    pub fn lookup_v4(&self, name: &str) -> &[Ipv4Addr] {
        self.name4.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// IPv6 addresses for a normalized hostname, first-seen order.
    pub fn lookup_v6(&self, name: &str) -> &[Ipv6Addr] {
        self.name6.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Hostnames mapped to an address, first-seen order.
    pub fn lookup_addr(&self, addr: &IpAddr) -> &[String] {
        self.addr.get(addr).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the hostname has IPv4 entries.
    pub fn has_v4(&self, name: &str) -> bool {
        self.name4.contains_key(name)
    }

    /// Whether the hostname has IPv6 entries.
    pub fn has_v6(&self, name: &str) -> bool {
        self.name6.contains_key(name)
    }

    /// Whether the hostname is known under either family.
    pub fn contains_name(&self, name: &str) -> bool {
        self.name4.contains_key(name) || self.name6.contains_key(name)
    }

    /// Number of distinct hostname entries across both families.
    pub fn len(&self) -> usize {
        self.name4.len() + self.name6.len()
    }

    /// Whether the table holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.name4.is_empty() && self.name6.is_empty()
    }
}

/// Normalize a hostname to lowercase FQDN form with one trailing dot.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.trim().trim_end_matches('.').to_ascii_lowercase();
    normalized.push('.');
    normalized
}

/// Decode the address embedded in a reverse-lookup query name.
///
/// Handles `in-addr.arpa` for IPv4 and nibble-format `ip6.arpa` for IPv6.
/// Returns None for anything else, including truncated reverse names.
pub fn reverse_address(qname: &str) -> Option<IpAddr> {
    let name = normalize_name(qname);
    if let Some(prefix) = name.strip_suffix(".in-addr.arpa.") {
        let mut octets = [0u8; 4];
        let mut count = 0;
        for part in prefix.split('.') {
            if count >= 4 {
                return None;
            }
            octets[count] = part.parse().ok()?;
            count += 1;
        }
        if count != 4 {
            return None;
        }
        // Labels run least-significant-octet first
        Some(IpAddr::V4(Ipv4Addr::new(
            octets[3], octets[2], octets[1], octets[0],
        )))
    } else if let Some(prefix) = name.strip_suffix(".ip6.arpa.") {
        let labels: Vec<&str> = prefix.split('.').collect();
        if labels.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, label) in labels.iter().rev().enumerate() {
            if label.len() != 1 {
                return None;
            }
            let nibble = u8::from_str_radix(label, 16).ok()?;
            bytes[i / 2] |= if i % 2 == 0 { nibble << 4 } else { nibble };
        }
        Some(IpAddr::V6(Ipv6Addr::from(bytes)))
    } else {
        None
    }
}
