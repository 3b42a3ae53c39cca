// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Search Engine Scraping Source
 * Paginated result-page scraping across multiple engines with pacing
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
use rand::Rng;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result-page URL templates: `{query}` and `{page_no}` are substituted
const SEARCH_ENGINES: &[(&str, &str)] = &[
    (
        "https://google.com/search?q={query}&btnG=Search&hl=en-US&gbv=1&start={page_no}&filter=0",
        "google",
    ),
    ("https://search.yahoo.com/search?p={query}&b={page_no}", "yahoo"),
    ("https://www.bing.com/search?q={query}&go=Submit&first={page_no}", "bing"),
    ("https://www.baidu.com/s?pn={page_no}&wd={query}&oq={query}", "baidu"),
];

/// Result offset step between pages, shared by all supported engines
const PAGE_STEP: u32 = 10;

/// Search-engine scraping adapter.
///
/// Each engine is paged sequentially with a randomized delay between pages
/// to avoid tripping upstream abuse detection; the delay is local to this
/// adapter's loop, not a global throttle. A failing engine only terminates
/// its own pagination. Page count and delay bounds are configurable so
/// tests can run without sleeping.
pub struct SearchEngineSource {
    http: Arc<HttpClient>,
    engines: Vec<(String, String)>,
    max_pages: u32,
    delay_secs: (u64, u64),
}

impl SearchEngineSource {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            engines: SEARCH_ENGINES
                .iter()
                .map(|(template, engine)| (template.to_string(), engine.to_string()))
                .collect(),
            max_pages: 5,
            delay_secs: (2, 7),
        }
    }

    /// Replace the engine templates (integration tests)
    pub fn with_engines(mut self, engines: Vec<(String, String)>) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Inter-page delay bounds in seconds; reversed bounds are swapped so
    /// the sampled range is always valid
    pub fn with_page_delay(mut self, min_secs: u64, max_secs: u64) -> Self {
        self.delay_secs = (min_secs.min(max_secs), min_secs.max(max_secs));
        self
    }

    async fn inter_page_delay(&self) {
        let (min, max) = self.delay_secs;
        if max == 0 {
            return;
        }
        let secs = rand::rng().random_range(min..=max);
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    async fn scrape_engine(
        &self,
        template: &str,
        engine: &str,
        query: &str,
        host_pattern: &Regex,
        domain: &Domain,
        hits: &mut SourceHits,
    ) {
        for page in 0..self.max_pages {
            let offset = page * PAGE_STEP;
            let url = template
                .replace("{query}", query)
                .replace("{page_no}", &offset.to_string());

            let body = match self.http.get(&url).await {
                Ok(response) => response.body,
                Err(err) => {
                    warn!(engine = engine, domain = %domain, error = %err, "Search engine page failed");
                    break;
                }
            };

            let mut page_hits = 0usize;
            for capture in host_pattern.captures_iter(&body) {
                if let Some(raw) = capture.get(1) {
                    if let Some((host, class)) = classify(raw.as_str(), domain) {
                        hits.insert(host, class);
                        page_hits += 1;
                    }
                }
            }

            debug!(
                engine = engine,
                domain = %domain,
                page = page + 1,
                matches = page_hits,
                "Search engine page scraped"
            );

            if page + 1 < self.max_pages {
                self.inter_page_delay().await;
            }
        }
    }
}

#[async_trait]
impl Source for SearchEngineSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SearchEngines
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let query = urlencoding::encode(&format!("site:{} -www.{}", domain, domain)).into_owned();

        // Single-label captures like `api.example.com`; deeper names are
        // still admitted because the classifier only checks the suffix.
        let host_pattern = Regex::new(&format!(r"([\w-]+\.{})", regex::escape(domain.as_str())))
            .map_err(|e| crate::errors::ReconError::General(format!("bad host pattern: {}", e)))?;

        let mut hits = SourceHits::new();
        for (template, engine) in &self.engines {
            self.scrape_engine(template, engine, &query, &host_pattern, domain, &mut hits)
                .await;
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_delay_bounds_are_swapped() {
        let source = SearchEngineSource::new(Arc::new(HttpClient::new(5).unwrap()))
            .with_page_delay(7, 2);
        assert_eq!(source.delay_secs, (2, 7));

        let source = SearchEngineSource::new(Arc::new(HttpClient::new(5).unwrap()))
            .with_page_delay(0, 0);
        assert_eq!(source.delay_secs, (0, 0));
    }

    #[test]
    fn test_default_engine_set_is_complete() {
        let source = SearchEngineSource::new(Arc::new(HttpClient::new(5).unwrap()));
        let engines: Vec<&str> = source.engines.iter().map(|(_, e)| e.as_str()).collect();
        assert_eq!(engines, ["google", "yahoo", "bing", "baidu"]);
    }
}
