// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - DNS Probe Source
 * Wildcard-existence probe and dictionary brute force over the resolver
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::classifier::classify;
use crate::errors::{NetworkError, ReconResult};
use crate::sources::Source;
use crate::types::{Domain, SourceHits, SourceKind};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, TokioResolver};
use tracing::{debug, warn};

/// Common subdomain labels probed individually against the resolver
const COMMON_SUBDOMAINS: &[&str] = &[
    "www", "api", "admin", "dev", "staging", "test", "qa", "uat",
    "mail", "smtp", "pop", "imap", "webmail",
    "ftp", "sftp", "ssh",
    "vpn", "remote", "access",
    "blog", "forum", "shop", "store",
    "cdn", "static", "assets", "media", "images",
    "m", "mobile", "app",
    "portal", "dashboard", "panel",
    "beta", "alpha", "demo",
    "git", "gitlab", "github", "bitbucket",
    "jenkins", "ci", "cd",
    "jira", "confluence", "wiki",
    "status", "monitor", "metrics",
    "db", "database", "mysql", "postgres", "mongo",
    "cache", "redis", "memcache",
    "backup", "backups",
    "old", "new", "legacy",
    "v1", "v2", "api-v1", "api-v2",
    "ws", "wss", "websocket",
    "grpc", "graphql", "rest",
    "docs", "documentation", "help",
    "support", "helpdesk", "service",
    "secure", "login", "auth", "oauth",
    "payment", "pay", "checkout",
    "internal", "corp", "corporate",
    "office", "intranet",
    "ns1", "ns2", "mx", "autodiscover", "cpanel",
];

/// Active DNS probe adapter.
///
/// Two sub-strategies: a single wildcard-existence probe (`*.<domain>` A
/// lookup), and a fixed dictionary of common labels probed concurrently.
/// NXDOMAIN/NoAnswer is a negative result, not an error; any other resolver
/// failure is logged and skipped. Cheap and idempotent, so it bypasses the
/// response cache.
pub struct DnsProbeSource {
    resolver: TokioResolver,
    concurrency: usize,
}

impl DnsProbeSource {
    pub fn new(concurrency: usize) -> ReconResult<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| NetworkError::DnsResolutionFailed {
                host: String::new(),
                reason: format!("failed to build resolver: {}", e),
            })?
            .build();

        Ok(Self {
            resolver,
            concurrency,
        })
    }

    /// Probe for a resolvable wildcard record on the target
    async fn wildcard_probe(&self, domain: &Domain, hits: &mut SourceHits) {
        let wildcard_name = format!("*.{}", domain);

        match self.resolver.lookup_ip(wildcard_name.as_str()).await {
            Ok(lookup) => {
                if lookup.iter().next().is_some() {
                    debug!(domain = %domain, "Wildcard DNS record resolves");
                    if let Some((host, class)) = classify(&wildcard_name, domain) {
                        hits.insert(host, class);
                    }
                }
            }
            Err(err) if is_negative(&err) => {
                debug!(domain = %domain, "No wildcard DNS record");
            }
            Err(err) => {
                warn!(domain = %domain, error = %err, "Wildcard probe failed");
            }
        }
    }

    /// Probe every dictionary label concurrently
    async fn dictionary_probe(&self, domain: &Domain, hits: &mut SourceHits) {
        let candidates: Vec<String> = COMMON_SUBDOMAINS
            .iter()
            .map(|label| format!("{}.{}", label, domain))
            .collect();

        let resolved = stream::iter(candidates)
            .map(|candidate| {
                let resolver = &self.resolver;

                async move {
                    match resolver.lookup_ip(candidate.as_str()).await {
                        Ok(lookup) if lookup.iter().next().is_some() => Some(candidate),
                        Ok(_) => None,
                        Err(err) if is_negative(&err) => None,
                        Err(err) => {
                            debug!(host = %candidate, error = %err, "Dictionary probe error");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        for candidate in resolved.into_iter().flatten() {
            if let Some((host, class)) = classify(&candidate, domain) {
                hits.insert(host, class);
            }
        }
    }
}

/// NXDOMAIN and empty answers are negative results rather than failures
fn is_negative(err: &ResolveError) -> bool {
    err.is_no_records_found()
}

#[async_trait]
impl Source for DnsProbeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DnsProbe
    }

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits> {
        let mut hits = SourceHits::new();

        self.wildcard_probe(domain, &mut hits).await;
        self.dictionary_probe(domain, &mut hits).await;

        debug!(
            domain = %domain,
            labels = COMMON_SUBDOMAINS.len(),
            found = hits.len(),
            "DNS probe complete"
        );

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_has_expected_breadth() {
        assert!(COMMON_SUBDOMAINS.len() >= 90);
        assert!(COMMON_SUBDOMAINS.contains(&"www"));
        assert!(COMMON_SUBDOMAINS.contains(&"mail"));
        assert!(COMMON_SUBDOMAINS.contains(&"ftp"));
    }

    #[test]
    fn test_every_candidate_name_classifies_in_scope() {
        let domain = Domain::parse("example.com").unwrap();
        for label in COMMON_SUBDOMAINS {
            let candidate = format!("{}.{}", label, domain);
            let (host, class) = classify(&candidate, &domain).expect("candidate must be admitted");
            assert_eq!(host, candidate);
            assert_eq!(class, crate::types::Classification::Literal);
        }
    }

    #[test]
    fn test_dictionary_labels_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for label in COMMON_SUBDOMAINS {
            assert!(seen.insert(label), "duplicate dictionary label: {}", label);
        }
    }
}
