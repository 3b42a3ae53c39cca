// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - DNSDumpster Source
 * Session-establishing scrape: CSRF token fetch, then query POST
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
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

const DNSDUMPSTER_BASE_URL: &str = "https://dnsdumpster.com";

/// DNSDumpster scraping adapter.
///
/// Two-step session: GET the landing page to receive the CSRF middleware
/// token (the session cookie rides along in the shared client's cookie
/// store), then POST the query with the token and a Referer header. Results
/// are scraped out of the response table cells.
pub struct DnsDumpsterSource {
    http: Arc<HttpClient>,
    base_url: String,
    token_pattern: Regex,
    host_pattern: Regex,
}

impl DnsDumpsterSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            base_url: DNSDUMPSTER_BASE_URL.to_string(),
            token_pattern: Regex::new(r#"name="csrfmiddlewaretoken" value="(.*?)""#)
                .expect("static pattern"),
            host_pattern: Regex::new(r#"<td class="col-md-4">(.*?)<br"#).expect("static pattern"),
        }
    }

    /// Point the adapter at a different endpoint (integration tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for DnsDumpsterSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DnsDumpster
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let page_url = format!("{}/", self.base_url);

        // Step 1: establish session and pull the CSRF token
        let landing = self.http.get(&page_url).await?;
        let token = self
            .token_pattern
            .captures(&landing.body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| SourceError::SessionFailed {
                origin: SourceKind::DnsDumpster.name().to_string(),
                reason: "csrfmiddlewaretoken not found in landing page".to_string(),
            })?;

        debug!(domain = %domain, "DNSDumpster session established");

        // Step 2: submit the query with the token and Referer
        let response = self
            .http
            .post_form(
                &page_url,
                &[
                    ("csrfmiddlewaretoken", token.as_str()),
                    ("targetip", domain.as_str()),
                ],
                &[("Referer", page_url.as_str())],
            )
            .await?;

        let mut hits = SourceHits::new();
        for capture in self.host_pattern.captures_iter(&response.body) {
            if let Some(raw) = capture.get(1) {
                if let Some((host, class)) = classify(raw.as_str(), domain) {
                    hits.insert(host, class);
                }
            }
        }

        debug!(
            domain = %domain,
            found = hits.len(),
            "DNSDumpster results scraped"
        );

        Ok(hits)
    }
}
