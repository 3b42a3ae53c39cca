// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Discovery Orchestrator
 * Concurrent fan-out across sources, fault-absorbing fan-in, merge
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::cache::ResponseCache;
use crate::config::DiscoveryConfig;
use crate::errors::ReconResult;
use crate::http_client::HttpClient;
use crate::reconciler::reconcile;
use crate::sources::{
    CertTransparencySource, DnsDumpsterSource, DnsProbeSource, NetcraftSource, PassiveDnsSource,
    SearchEngineSource, Source, ThreatCrowdSource, VirusTotalSource,
};
use crate::store::DomainStore;
use crate::types::{Delta, Discovery, Domain};
use futures::future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Coordinates one discovery run across every enabled intelligence source.
///
/// The orchestrator owns the shared HTTP client and the response cache and
/// passes both explicitly to the adapters that need them; there is no
/// hidden cross-instance state. Adapter-held resources (the pooled HTTP
/// client) are released when the orchestrator is dropped after fan-in.
pub struct Orchestrator {
    cache: Arc<ResponseCache>,
    sources: Vec<Arc<dyn Source>>,
}

impl Orchestrator {
    /// Build an orchestrator with the sources enabled in `config`.
    ///
    /// Failure to construct the shared HTTP client or the resolver is
    /// systemic and surfaces to the caller, unlike per-source failures
    /// during a run.
    pub fn new(config: &DiscoveryConfig) -> ReconResult<Self> {
        let http = Arc::new(HttpClient::new(config.http_timeout_secs)?);
        let cache = Arc::new(ResponseCache::with_config(
            config.cache_capacity,
            config.cache_ttl_secs,
        ));

        let mut sources: Vec<Arc<dyn Source>> = Vec::new();

        if config.use_cert_transparency {
            sources.push(Arc::new(CertTransparencySource::new(
                Arc::clone(&http),
                Arc::clone(&cache),
                config.retry_config(),
            )));
        }
        if config.use_dns_probe {
            sources.push(Arc::new(DnsProbeSource::new(config.dns_concurrency)?));
        }
        if config.use_search_engines {
            sources.push(Arc::new(
                SearchEngineSource::new(Arc::clone(&http))
                    .with_max_pages(config.max_search_pages)
                    .with_page_delay(config.page_delay_min_secs, config.page_delay_max_secs),
            ));
        }
        if config.use_netcraft {
            sources.push(Arc::new(NetcraftSource::new(Arc::clone(&http))));
        }
        if config.use_dnsdumpster {
            sources.push(Arc::new(DnsDumpsterSource::new(Arc::clone(&http))));
        }
        if config.use_virustotal {
            sources.push(Arc::new(VirusTotalSource::new(Arc::clone(&http))));
        }
        if config.use_threatcrowd {
            sources.push(Arc::new(ThreatCrowdSource::new(Arc::clone(&http))));
        }
        if config.use_passive_dns {
            sources.push(Arc::new(PassiveDnsSource::new(Arc::clone(&http))));
        }

        Ok(Self { cache, sources })
    }

    /// Build an orchestrator over an explicit source set (tests, embedding)
    pub fn from_sources(sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            cache: Arc::new(ResponseCache::new()),
            sources,
        }
    }

    /// Shared response cache, exposed for stats and test assertions
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Run discovery for one target.
    ///
    /// Fan-out is fully concurrent; fan-in is a join barrier with no
    /// partial results. A failing source contributes zero hostnames and is
    /// recorded in the run's stats; it can never abort the run.
    pub async fn discover(&self, input: &str) -> ReconResult<Discovery> {
        let domain = Domain::parse(input)?;

        info!(
            domain = %domain,
            sources = self.sources.len(),
            "Starting subdomain discovery"
        );

        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let domain = domain.clone();

            async move {
                let started = Instant::now();
                let result = source.fetch(&domain).await;
                let latency_ms = started.elapsed().as_millis() as u64;

                match &result {
                    Ok(hits) => info!(
                        source = %source.kind(),
                        domain = %domain,
                        outcome = "ok",
                        hosts = hits.len(),
                        latency_ms = latency_ms,
                        "Source fetch complete"
                    ),
                    Err(err) => warn!(
                        source = %source.kind(),
                        domain = %domain,
                        outcome = "error",
                        error = %err,
                        latency_ms = latency_ms,
                        "Source fetch failed, contributing zero results"
                    ),
                }

                (source.kind(), result)
            }
        });

        let outcomes = future::join_all(fetches).await;

        let mut discovery = Discovery::new(domain.clone());
        for (kind, result) in outcomes {
            match result {
                Ok(hits) => {
                    discovery.stats.per_source.insert(kind, hits.len());
                    discovery.literal.extend(hits.literal);
                    discovery.wildcard.extend(hits.wildcard);
                }
                Err(_) => {
                    discovery.stats.failed_sources.insert(kind);
                }
            }
        }

        info!(
            domain = %domain,
            literal = discovery.literal.len(),
            wildcard = discovery.wildcard.len(),
            failed_sources = discovery.stats.failed_sources.len(),
            "Discovery complete"
        );

        Ok(discovery)
    }

    /// Run discovery, then reconcile against the owner's persisted
    /// baseline. Store failures surface; discovery-side source failures
    /// are absorbed exactly as in [`Self::discover`].
    pub async fn discover_and_reconcile(
        &self,
        input: &str,
        owner: &str,
        store: &dyn DomainStore,
    ) -> ReconResult<Delta> {
        let discovery = self.discover(input).await?;
        reconcile(store, &discovery, owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{HttpError, ReconError};
    use crate::store::MemoryStore;
    use crate::types::{Classification, SourceHits, SourceKind};
    use async_trait::async_trait;

    struct StubSource {
        kind: SourceKind,
        hits: SourceHits,
    }

    impl StubSource {
        fn new(kind: SourceKind, hosts: &[(&str, Classification)]) -> Arc<Self> {
            let mut hits = SourceHits::new();
            for (host, class) in hosts {
                hits.insert(host.to_string(), *class);
            }
            Arc::new(Self { kind, hits })
        }
    }

    #[async_trait]
    impl Source for StubSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, _domain: &Domain) -> ReconResult<SourceHits> {
            Ok(self.hits.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl Source for FailingSource {
        fn kind(&self) -> SourceKind {
            SourceKind::CertTransparency
        }

        async fn fetch(&self, _domain: &Domain) -> ReconResult<SourceHits> {
            Err(ReconError::Http(HttpError::ServerError {
                status_code: 503,
                url: "https://crt.sh".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_merge_unions_and_dedups_across_sources() {
        let orchestrator = Orchestrator::from_sources(vec![
            StubSource::new(
                SourceKind::CertTransparency,
                &[
                    ("www.example.com", Classification::Literal),
                    ("*.dev.example.com", Classification::Wildcard),
                ],
            ),
            StubSource::new(
                SourceKind::ThreatCrowd,
                &[
                    ("www.example.com", Classification::Literal),
                    ("api.example.com", Classification::Literal),
                ],
            ),
        ]);

        let discovery = orchestrator.discover("example.com").await.unwrap();

        assert_eq!(discovery.count(), 3);
        assert!(discovery.literal.contains("www.example.com"));
        assert!(discovery.literal.contains("api.example.com"));
        assert!(discovery.wildcard.contains("*.dev.example.com"));
    }

    #[tokio::test]
    async fn test_literal_and_wildcard_stay_disjoint() {
        let orchestrator = Orchestrator::from_sources(vec![
            StubSource::new(
                SourceKind::CertTransparency,
                &[
                    ("dev.example.com", Classification::Literal),
                    ("*.dev.example.com", Classification::Wildcard),
                ],
            ),
            StubSource::new(
                SourceKind::DnsProbe,
                &[("dev.example.com", Classification::Literal)],
            ),
        ]);

        let discovery = orchestrator.discover("example.com").await.unwrap();

        // The bare name and the wildcard pattern are distinct strings and
        // keep their own classifications.
        assert!(discovery.literal.contains("dev.example.com"));
        assert!(discovery.wildcard.contains("*.dev.example.com"));
        let overlap: Vec<_> = discovery.literal.intersection(&discovery.wildcard).collect();
        assert!(overlap.is_empty());
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_discovery() {
        let orchestrator = Orchestrator::from_sources(vec![
            Arc::new(FailingSource),
            StubSource::new(
                SourceKind::DnsProbe,
                &[("mail.example.com", Classification::Literal)],
            ),
        ]);

        let discovery = orchestrator.discover("example.com").await.unwrap();

        assert_eq!(discovery.count(), 1);
        assert!(discovery.literal.contains("mail.example.com"));
        assert!(discovery
            .stats
            .failed_sources
            .contains(&SourceKind::CertTransparency));
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_result_not_error() {
        let orchestrator = Orchestrator::from_sources(vec![Arc::new(FailingSource)]);

        let discovery = orchestrator.discover("example.com").await.unwrap();
        assert_eq!(discovery.count(), 0);
    }

    #[tokio::test]
    async fn test_discover_normalizes_url_input() {
        let orchestrator = Orchestrator::from_sources(vec![StubSource::new(
            SourceKind::DnsProbe,
            &[("www.example.com", Classification::Literal)],
        )]);

        let discovery = orchestrator
            .discover("https://Example.COM:443/login")
            .await
            .unwrap();
        assert_eq!(discovery.domain.as_str(), "example.com");
    }

    #[tokio::test]
    async fn test_discover_rejects_unparseable_input() {
        let orchestrator = Orchestrator::from_sources(vec![]);
        assert!(orchestrator.discover("").await.is_err());
    }

    #[tokio::test]
    async fn test_discover_and_reconcile_end_to_end() {
        let orchestrator = Orchestrator::from_sources(vec![StubSource::new(
            SourceKind::CertTransparency,
            &[
                ("www.example.com", Classification::Literal),
                ("api.example.com", Classification::Literal),
            ],
        )]);
        let store = MemoryStore::new();

        let first = orchestrator
            .discover_and_reconcile("example.com", "user-1", &store)
            .await
            .unwrap();
        assert!(first.has_new());
        assert_eq!(first.new_hosts.len(), 2);

        let second = orchestrator
            .discover_and_reconcile("example.com", "user-1", &store)
            .await
            .unwrap();
        assert!(!second.has_new());
    }
}
