// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Harava
 * Concurrent subdomain reconnaissance engine
 *
 * Fans out a target domain to certificate transparency logs, DNS probing,
 * search engines, and threat-intelligence feeds, merges the results into a
 * classified inventory, and reconciles it against a persisted baseline.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod cache;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod http_client;
pub mod orchestrator;
pub mod reconciler;
pub mod retry;
pub mod sources;
pub mod store;
pub mod types;

pub use cache::{CacheStats, ResponseCache};
pub use classifier::classify;
pub use config::{DatabaseConfig, DiscoveryConfig};
pub use errors::{ReconError, ReconResult};
pub use http_client::HttpClient;
pub use orchestrator::Orchestrator;
pub use reconciler::reconcile;
pub use retry::{retry_with_backoff, RetryConfig};
pub use sources::Source;
pub use store::{DomainStore, MemoryStore, PgDomainStore};
pub use types::{Classification, Delta, Discovery, Domain, SourceHits, SourceKind};
