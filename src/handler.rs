//! Query resolution and the handler chain link
//!
//! Implements the chain-of-responsibility seam ([`DnsHandler`]) and the
//! hosts-backed link ([`HostsHandler`]). A query is first scoped against
//! the configured origins, then resolved against a single snapshot of the
//! current table. On no-match the handler either delegates the identical
//! query to the next link (fallthrough) or answers name-not-found itself.

use crate::config::HostsConfig;
use crate::error::{HostsError, Result};
use crate::hostsfile::{normalize_name, reverse_address};
use crate::table::TableHolder;
use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{A, AAAA, PTR};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// TTL stapled to every answer record
pub const HOSTS_TTL: u32 = 3600;

/// One query travelling down the handler chain.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    /// Queried name
    pub name: Name,
    /// Requested record type
    pub qtype: RecordType,
    /// Query class; carried through the chain unmodified
    pub qclass: DNSClass,
}

impl DnsQuery {
    /// Create an IN-class query.
    pub fn new(name: Name, qtype: RecordType) -> Self {
        Self {
            name,
            qtype,
            qclass: DNSClass::IN,
        }
    }
}

/// Response produced by a handler in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct DnsResponse {
    /// Response code
    pub code: ResponseCode,
    /// Whether this handler answered authoritatively
    pub authoritative: bool,
    /// Answer records, in resolution order
    pub answers: Vec<Record>,
}

impl DnsResponse {
    /// Authoritative answer with records.
    pub fn answer(answers: Vec<Record>) -> Self {
        Self {
            code: ResponseCode::NoError,
            authoritative: true,
            answers,
        }
    }

    /// Authoritative empty answer: the name is known, but not for the
    /// queried record type.
    pub fn no_data() -> Self {
        Self {
            code: ResponseCode::NoError,
            authoritative: true,
            answers: Vec::new(),
        }
    }

    /// Authoritative name-not-found answer.
    pub fn name_error() -> Self {
        Self {
            code: ResponseCode::NXDomain,
            authoritative: true,
            answers: Vec::new(),
        }
    }
}

/// One link in an ordered chain of query handlers.
///
/// Each link either produces a response or forwards the identical query
/// to its successor and returns that result unmodified.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// Handle a query, possibly by delegating down the chain.
    async fn handle(&self, query: &DnsQuery) -> Result<DnsResponse>;

    /// Name of this handler, for logs.
    fn name(&self) -> &'static str;
}

/// Hosts-table link in the handler chain.
///
/// Holds only immutable configuration plus shared references; all
/// mutable state lives in the [`TableHolder`].
pub struct HostsHandler {
    origins: Vec<String>,
    fall_through: bool,
    holder: Arc<TableHolder>,
    next: Option<Arc<dyn DnsHandler>>,
}

impl HostsHandler {
    /// Create the chain link for a configured hosts table.
    pub fn new(
        config: &HostsConfig,
        holder: Arc<TableHolder>,
        next: Option<Arc<dyn DnsHandler>>,
    ) -> Self {
        Self {
            origins: config.origins.clone(),
            fall_through: config.fallthrough,
            holder,
            next,
        }
    }

    fn in_origins(&self, qname: &str) -> bool {
        self.origins.is_empty() || self.origins.iter().any(|origin| name_under_origin(qname, origin))
    }

    /// Resolve against one snapshot of the current table.
    ///
    /// Returns the answer records and whether the query matched. A name
    /// known under a different record type counts as matched with zero
    /// records, so the caller can answer an authoritative empty response
    /// instead of delegating.
    fn resolve(&self, qname: &str, query: &DnsQuery) -> (Vec<Record>, bool) {
        let table = self.holder.load();

        let mut answers = Vec::new();
        match query.qtype {
            RecordType::A => {
                for ip in table.lookup_v4(qname) {
                    answers.push(Record::from_rdata(
                        query.name.clone(),
                        HOSTS_TTL,
                        RData::A(A(*ip)),
                    ));
                }
            }
            RecordType::AAAA => {
                for ip in table.lookup_v6(qname) {
                    answers.push(Record::from_rdata(
                        query.name.clone(),
                        HOSTS_TTL,
                        RData::AAAA(AAAA(*ip)),
                    ));
                }
            }
            RecordType::PTR => {
                if let Some(addr) = reverse_address(qname) {
                    for host in table.lookup_addr(&addr) {
                        // Skip hostnames that don't form a valid wire name
                        let Ok(target) = Name::from_str(host) else {
                            continue;
                        };
                        answers.push(Record::from_rdata(
                            query.name.clone(),
                            HOSTS_TTL,
                            RData::PTR(PTR(target)),
                        ));
                    }
                }
            }
            _ => {}
        }

        let matched = !answers.is_empty()
            || match query.qtype {
                RecordType::A => table.has_v6(qname),
                RecordType::AAAA => table.has_v4(qname),
                RecordType::PTR => false,
                _ => table.contains_name(qname),
            };

        (answers, matched)
    }

    async fn delegate_or_refuse(&self, query: &DnsQuery, qname: &str) -> Result<DnsResponse> {
        if self.fall_through {
            match &self.next {
                Some(next) => {
                    debug!(qname, next = next.name(), "falling through");
                    next.handle(query).await
                }
                None => Err(HostsError::NoNextHandler(qname.to_string())),
            }
        } else {
            Ok(DnsResponse::name_error())
        }
    }
}

#[async_trait]
impl DnsHandler for HostsHandler {
    async fn handle(&self, query: &DnsQuery) -> Result<DnsResponse> {
        let qname = normalize_name(&query.name.to_string());

        if !self.in_origins(&qname) {
            return self.delegate_or_refuse(query, &qname).await;
        }

        let (answers, matched) = self.resolve(&qname, query);
        if !matched {
            return self.delegate_or_refuse(query, &qname).await;
        }
        if answers.is_empty() {
            return Ok(DnsResponse::no_data());
        }
        Ok(DnsResponse::answer(answers))
    }

    fn name(&self) -> &'static str {
        "hosts"
    }
}

/// Suffix match on whole labels: `web.example.org.` is under
/// `example.org.` and under `.`, but `ample.org.` never matches
/// `example.org.`.
fn name_under_origin(name: &str, origin: &str) -> bool {
    if origin == "." || name == origin {
        return true;
    }
    name.ends_with(origin) && name.as_bytes()[name.len() - origin.len() - 1] == b'.'
}
