// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Certificate Transparency Source
 * crt.sh log queries with response caching and bounded retry
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::cache::ResponseCache;
use crate::classifier::classify;
use crate::errors::{ReconResult, SourceError};
use crate::http_client::HttpClient;
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::sources::Source;
use crate::types::{Domain, SourceHits, SourceKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const CRTSH_BASE_URL: &str = "https://crt.sh";

/// One certificate entry from the crt.sh JSON output.
///
/// `name_value` holds newline-separated subject names; everything else in
/// the payload is ignored.
#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// Certificate-transparency log adapter.
///
/// crt.sh is the canonical flaky upstream: it rate-limits aggressively and
/// returns truncated JSON under load, so every remote fetch runs under the
/// exponential-backoff policy and successful results are memoized in the
/// shared response cache for the freshness window.
pub struct CertTransparencySource {
    http: Arc<HttpClient>,
    cache: Arc<ResponseCache>,
    retry: RetryConfig,
    base_url: String,
}

impl CertTransparencySource {
    pub fn new(http: Arc<HttpClient>, cache: Arc<ResponseCache>, retry: RetryConfig) -> Self {
        Self {
            http,
            cache,
            retry,
            base_url: CRTSH_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint (integration tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_remote(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let url = format!("{}/?q=%.{}&output=json", self.base_url, domain);

        let response = self.http.get(&url).await?;

        let entries: Vec<CrtShEntry> =
            serde_json::from_str(&response.body).map_err(|e| SourceError::UnparseablePayload {
                origin: SourceKind::CertTransparency.name().to_string(),
                reason: e.to_string(),
            })?;

        let mut hits = SourceHits::new();
        for entry in &entries {
            for name in entry.name_value.lines() {
                if let Some((host, class)) = classify(name, domain) {
                    hits.insert(host, class);
                }
            }
        }

        debug!(
            domain = %domain,
            entries = entries.len(),
            literal = hits.literal.len(),
            wildcard = hits.wildcard.len(),
            "crt.sh query complete"
        );

        Ok(hits)
    }
}

#[async_trait]
impl Source for CertTransparencySource {
    fn kind(&self) -> SourceKind {
        SourceKind::CertTransparency
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        if let Some(snapshot) = self.cache.get(domain).await {
            return Ok(snapshot);
        }

        let hits =
            retry_with_backoff(&self.retry, "crtsh_query", || self.fetch_remote(domain)).await?;

        self.cache.put(domain.clone(), hits.clone()).await;
        Ok(hits)
    }
}
