// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Discovery Reconciler
 * Diffs fresh discovery results against the persisted baseline
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::ReconResult;
use crate::store::DomainStore;
use crate::types::{Delta, Discovery};
use tracing::info;

/// Compare a fresh discovery against the owner's persisted baseline and
/// persist the union.
///
/// Append-only: hostnames that disappeared upstream stay in the store.
/// Unlike source failures, any store failure here propagates to the caller;
/// the batch insert is transactional, so a failed reconciliation persists
/// nothing.
pub async fn reconcile(
    store: &dyn DomainStore,
    discovery: &Discovery,
    owner: &str,
) -> ReconResult<Delta> {
    let all_hosts = discovery.all_hosts();

    let domain_id = match store.find_domain(discovery.domain.as_str(), owner).await? {
        Some(id) => id,
        None => store.create_domain(discovery.domain.as_str(), owner).await?,
    };

    let existing = store.list_hostnames(domain_id).await?;
    let new_hosts = all_hosts.difference(&existing).cloned().collect();

    let inserted = store.insert_hostnames_if_absent(domain_id, &all_hosts).await?;

    let delta = Delta {
        domain: discovery.domain.clone(),
        all_hosts,
        new_hosts,
    };

    info!(
        domain = %discovery.domain,
        owner = owner,
        total = delta.all_hosts.len(),
        new = delta.new_hosts.len(),
        inserted = inserted,
        "Reconciliation complete"
    );

    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ReconError, StoreError};
    use crate::store::{DomainId, MemoryStore};
    use crate::types::Domain;
    use async_trait::async_trait;
    use std::collections::BTreeSet;

    fn discovery_with(literal: &[&str], wildcard: &[&str]) -> Discovery {
        let mut disc = Discovery::new(Domain::parse("example.com").unwrap());
        disc.literal = literal.iter().map(|s| s.to_string()).collect();
        disc.wildcard = wildcard.iter().map(|s| s.to_string()).collect();
        disc
    }

    #[tokio::test]
    async fn test_first_run_reports_everything_as_new() {
        let store = MemoryStore::new();
        let disc = discovery_with(&["www.example.com", "api.example.com"], &["*.dev.example.com"]);

        let delta = reconcile(&store, &disc, "user-1").await.unwrap();

        assert_eq!(delta.all_hosts.len(), 3);
        assert_eq!(delta.new_hosts.len(), 3);
        assert!(delta.has_new());
    }

    #[tokio::test]
    async fn test_delta_against_existing_baseline() {
        let store = MemoryStore::new();
        let id = store.create_domain("example.com", "user-1").await.unwrap();
        let mut baseline = BTreeSet::new();
        baseline.insert("www.example.com".to_string());
        store.insert_hostnames_if_absent(id, &baseline).await.unwrap();

        let disc = discovery_with(&["www.example.com", "api.example.com"], &[]);
        let delta = reconcile(&store, &disc, "user-1").await.unwrap();

        assert_eq!(
            delta.new_hosts,
            ["api.example.com".to_string()].into_iter().collect()
        );
        assert!(delta.has_new());
    }

    #[tokio::test]
    async fn test_second_identical_run_is_idempotent() {
        let store = MemoryStore::new();
        let disc = discovery_with(&["www.example.com"], &["*.dev.example.com"]);

        let first = reconcile(&store, &disc, "user-1").await.unwrap();
        assert!(first.has_new());

        let second = reconcile(&store, &disc, "user-1").await.unwrap();
        assert!(!second.has_new());
        assert!(second.new_hosts.is_empty());

        // No duplicate rows were created
        let id = store
            .find_domain("example.com", "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.list_hostnames(id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_baselines_are_owner_scoped() {
        let store = MemoryStore::new();
        let disc = discovery_with(&["www.example.com"], &[]);

        reconcile(&store, &disc, "user-1").await.unwrap();
        let other = reconcile(&store, &disc, "user-2").await.unwrap();

        // A different owner sees the same hosts as new
        assert!(other.has_new());
    }

    struct FailingStore;

    #[async_trait]
    impl DomainStore for FailingStore {
        async fn find_domain(&self, _: &str, _: &str) -> ReconResult<Option<DomainId>> {
            Ok(Some(1))
        }

        async fn create_domain(&self, _: &str, _: &str) -> ReconResult<DomainId> {
            Ok(1)
        }

        async fn list_hostnames(&self, _: DomainId) -> ReconResult<BTreeSet<String>> {
            Ok(BTreeSet::new())
        }

        async fn insert_hostnames_if_absent(
            &self,
            _: DomainId,
            _: &BTreeSet<String>,
        ) -> ReconResult<u64> {
            Err(ReconError::Store(StoreError::TransactionFailed {
                reason: "connection lost".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_to_caller() {
        let disc = discovery_with(&["www.example.com"], &[]);
        let result = reconcile(&FailingStore, &disc, "user-1").await;

        assert!(matches!(result, Err(ReconError::Store(_))));
    }
}
