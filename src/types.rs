// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Core Types
 * Normalized domains, discovery results, and reconciliation deltas
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ReconError, ReconResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A normalized enumeration target: lowercase hostname, no scheme, port or path.
///
/// Equality is exact byte equality, which is case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Normalize raw caller input into a domain.
    ///
    /// Accepts bare hostnames (`Example.COM`) as well as full URLs
    /// (`https://user@example.com:8443/path`); everything but the host
    /// portion is discarded.
    pub fn parse(input: &str) -> ReconResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReconError::InvalidDomain("empty input".to_string()));
        }

        // url::Url refuses scheme-less input, so prefix one before parsing.
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let parsed = url::Url::parse(&with_scheme)
            .map_err(|e| ReconError::InvalidDomain(format!("{}: {}", trimmed, e)))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ReconError::InvalidDomain(format!("no host in '{}'", trimmed)))?;

        let normalized = host.trim_matches('.').to_lowercase();
        if normalized.is_empty() {
            return Err(ReconError::InvalidDomain(trimmed.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape of a discovered hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Resolves to one concrete name (`www.example.com`)
    Literal,
    /// A pattern covering many names (`*.dev.example.com`)
    Wildcard,
}

/// Intelligence sources queried during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    CertTransparency,
    DnsProbe,
    SearchEngines,
    Netcraft,
    DnsDumpster,
    VirusTotal,
    ThreatCrowd,
    PassiveDns,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::CertTransparency => "cert_transparency",
            SourceKind::DnsProbe => "dns_probe",
            SourceKind::SearchEngines => "search_engines",
            SourceKind::Netcraft => "netcraft",
            SourceKind::DnsDumpster => "dnsdumpster",
            SourceKind::VirusTotal => "virustotal",
            SourceKind::ThreatCrowd => "threatcrowd",
            SourceKind::PassiveDns => "passive_dns",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-source contribution counts recorded during fan-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Hostnames contributed per source, before cross-source dedup
    pub per_source: BTreeMap<SourceKind, usize>,
    /// Sources that failed and were absorbed to zero results
    pub failed_sources: BTreeSet<SourceKind>,
}

/// One source adapter's classified contribution to a discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHits {
    pub literal: BTreeSet<String>,
    pub wildcard: BTreeSet<String>,
}

impl SourceHits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hostname under its classification
    pub fn insert(&mut self, host: String, class: Classification) {
        match class {
            Classification::Literal => self.literal.insert(host),
            Classification::Wildcard => self.wildcard.insert(host),
        };
    }

    /// Total hostnames held across both classifications
    pub fn len(&self) -> usize {
        self.literal.len() + self.wildcard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty() && self.wildcard.is_empty()
    }
}

/// Unified result of one discovery run.
///
/// `literal` and `wildcard` are disjoint by construction: every member was
/// admitted through [`crate::classifier::classify`], which assigns exactly
/// one classification per literal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discovery {
    pub domain: Domain,
    pub literal: BTreeSet<String>,
    pub wildcard: BTreeSet<String>,
    #[serde(default)]
    pub stats: DiscoveryStats,
}

impl Discovery {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            literal: BTreeSet::new(),
            wildcard: BTreeSet::new(),
            stats: DiscoveryStats::default(),
        }
    }

    /// Total distinct hostnames across both classifications
    pub fn count(&self) -> usize {
        self.literal.len() + self.wildcard.len()
    }

    /// Union of literal and wildcard hostnames
    pub fn all_hosts(&self) -> BTreeSet<String> {
        self.literal.union(&self.wildcard).cloned().collect()
    }
}

/// Outcome of reconciling a fresh discovery against the persisted baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub domain: Domain,
    /// Every hostname observed in the fresh run
    pub all_hosts: BTreeSet<String>,
    /// Hostnames not present in the persisted baseline
    pub new_hosts: BTreeSet<String>,
}

impl Delta {
    pub fn has_new(&self) -> bool {
        !self.new_hosts.is_empty()
    }
}
