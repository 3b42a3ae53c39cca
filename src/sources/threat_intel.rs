// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Threat Intelligence Sources
 * VirusTotal, ThreatCrowd, and passive-DNS JSON API lookups
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::classifier::classify;
use crate::errors::{ReconResult, SourceError};
use crate::http_client::HttpClient;
use crate::sources::Source;
use crate::types::{Domain, SourceHits, SourceKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com";
const THREATCROWD_BASE_URL: &str = "https://www.threatcrowd.org";
const PASSIVE_DNS_BASE_URL: &str = "https://api.sublist3r.com";

fn parse_payload<'a, T: Deserialize<'a>>(kind: SourceKind, body: &'a str) -> ReconResult<T> {
    serde_json::from_str(body)
        .map_err(|e| {
            SourceError::UnparseablePayload {
                origin: kind.name().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

// ---------------------------------------------------------------------------
// VirusTotal
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VirusTotalResponse {
    #[serde(default)]
    data: Vec<VirusTotalObject>,
}

#[derive(Debug, Deserialize)]
struct VirusTotalObject {
    #[serde(rename = "type")]
    object_type: String,
    id: String,
}

/// VirusTotal domain-relations adapter
pub struct VirusTotalSource {
    http: Arc<HttpClient>,
    base_url: String,
}

impl VirusTotalSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            base_url: VIRUSTOTAL_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for VirusTotalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::VirusTotal
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let url = format!("{}/ui/domains/{}/subdomains", self.base_url, domain);

        let response = self.http.get(&url).await?;
        let payload: VirusTotalResponse = parse_payload(self.kind(), &response.body)?;

        let mut hits = SourceHits::new();
        for object in payload.data {
            if object.object_type != "domain" {
                continue;
            }
            if let Some((host, class)) = classify(&object.id, domain) {
                hits.insert(host, class);
            }
        }

        debug!(domain = %domain, found = hits.len(), "VirusTotal query complete");
        Ok(hits)
    }
}

// ---------------------------------------------------------------------------
// ThreatCrowd
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ThreatCrowdReport {
    #[serde(default)]
    subdomains: Vec<String>,
}

/// ThreatCrowd domain-report adapter
pub struct ThreatCrowdSource {
    http: Arc<HttpClient>,
    base_url: String,
}

impl ThreatCrowdSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            base_url: THREATCROWD_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for ThreatCrowdSource {
    fn kind(&self) -> SourceKind {
        SourceKind::ThreatCrowd
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let url = format!(
            "{}/searchApi/v2/domain/report/?domain={}",
            self.base_url, domain
        );

        let response = self.http.get(&url).await?;
        let report: ThreatCrowdReport = parse_payload(self.kind(), &response.body)?;

        let mut hits = SourceHits::new();
        for raw in report.subdomains {
            if let Some((host, class)) = classify(&raw, domain) {
                hits.insert(host, class);
            }
        }

        debug!(domain = %domain, found = hits.len(), "ThreatCrowd query complete");
        Ok(hits)
    }
}

// ---------------------------------------------------------------------------
// Passive DNS (sublist3r API)
// ---------------------------------------------------------------------------

/// Passive-DNS aggregator adapter; the API returns a bare JSON string array
pub struct PassiveDnsSource {
    http: Arc<HttpClient>,
    base_url: String,
}

impl PassiveDnsSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            base_url: PASSIVE_DNS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for PassiveDnsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PassiveDns
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let url = format!("{}/search.php?domain={}", self.base_url, domain);

        let response = self.http.get(&url).await?;
        let subdomains: Vec<String> = parse_payload(self.kind(), &response.body)?;

        let mut hits = SourceHits::new();
        for raw in subdomains {
            if let Some((host, class)) = classify(&raw, domain) {
                hits.insert(host, class);
            }
        }

        debug!(domain = %domain, found = hits.len(), "Passive DNS query complete");
        Ok(hits)
    }
}
