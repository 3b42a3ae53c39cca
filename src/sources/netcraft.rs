// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Netcraft Source
 * Reverse-DNS aggregator result-page scraping
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::classifier::classify;
use crate::errors::ReconResult;
use crate::http_client::HttpClient;
use crate::sources::Source;
use crate::types::{Domain, SourceHits, SourceKind};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

const NETCRAFT_BASE_URL: &str = "https://searchdns.netcraft.com";

/// Netcraft searchdns aggregator adapter.
///
/// One GET against the results page; host links are pulled out of the
/// results table and the host portion extracted via URL parsing before
/// classification.
pub struct NetcraftSource {
    http: Arc<HttpClient>,
    base_url: String,
    link_pattern: Regex,
}

impl NetcraftSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            base_url: NETCRAFT_BASE_URL.to_string(),
            link_pattern: Regex::new(r#"<a class="results-table__host" href="(.*?)""#)
                .expect("static pattern"),
        }
    }

    /// Point the adapter at a different endpoint (integration tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for NetcraftSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Netcraft
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let url = format!(
            "{}/?restriction=site+ends+with&host={}",
            self.base_url, domain
        );

        let response = self.http.get(&url).await?;

        let mut hits = SourceHits::new();
        for capture in self.link_pattern.captures_iter(&response.body) {
            let link = match capture.get(1) {
                Some(m) => m.as_str(),
                None => continue,
            };
            let parsed = match url::Url::parse(link) {
                Ok(parsed) => parsed,
                // Relative or malformed link, nothing to extract
                Err(_) => continue,
            };
            if let Some(host) = parsed.host_str() {
                if let Some((host, class)) = classify(host, domain) {
                    hits.insert(host, class);
                }
            }
        }

        debug!(
            domain = %domain,
            found = hits.len(),
            "Netcraft page scraped"
        );

        Ok(hits)
    }
}
