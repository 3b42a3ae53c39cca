// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Domain Persistence Layer
 * Baseline store interface with PostgreSQL and in-memory implementations
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use crate::config::DatabaseConfig;
use crate::errors::{ReconResult, StoreError};
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use tokio_postgres::NoTls;
use tracing::{debug, info};

pub type DomainId = i64;

/// Persisted baseline of domains and hostnames, scoped per owner.
///
/// The store is read/append-only from the reconciler's perspective: stale
/// hostnames are never deleted. Hostname insertion must be idempotent
/// (unique on domain + hostname) and `insert_hostnames_if_absent` must
/// apply the whole batch in one transactional unit, rolling back partial
/// writes on failure.
#[async_trait]
pub trait DomainStore: Send + Sync {
    async fn find_domain(&self, name: &str, owner: &str) -> ReconResult<Option<DomainId>>;

    /// Create-if-absent; last-writer-wins on the domain row is acceptable
    async fn create_domain(&self, name: &str, owner: &str) -> ReconResult<DomainId>;

    async fn list_hostnames(&self, domain_id: DomainId) -> ReconResult<BTreeSet<String>>;

    /// Insert every hostname not already recorded, atomically.
    /// Returns the number of rows actually inserted.
    async fn insert_hostnames_if_absent(
        &self,
        domain_id: DomainId,
        hosts: &BTreeSet<String>,
    ) -> ReconResult<u64>;
}

/// PostgreSQL-backed store with connection pooling
pub struct PgDomainStore {
    pool: Pool,
}

impl PgDomainStore {
    pub async fn new(config: &DatabaseConfig) -> ReconResult<Self> {
        let mut pg_config = Config::new();
        pg_config.url = Some(config.url.clone());
        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(config.pool_size));

        let pool = pg_config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StoreError::ConnectionFailed {
                reason: format!("Failed to create PostgreSQL pool: {}", e),
            })?;

        // Test connection
        let client = pool.get().await?;
        client.query("SELECT 1", &[]).await?;

        info!(pool_size = config.pool_size, "PostgreSQL store connected");

        Ok(Self { pool })
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> ReconResult<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS domains (
                    id BIGSERIAL PRIMARY KEY,
                    owner_id VARCHAR(255) NOT NULL,
                    name VARCHAR(255) NOT NULL,
                    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                    UNIQUE (owner_id, name)
                )
                "#,
                &[],
            )
            .await?;

        client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS hostnames (
                    id BIGSERIAL PRIMARY KEY,
                    domain_id BIGINT NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
                    hostname VARCHAR(512) NOT NULL,
                    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                    UNIQUE (domain_id, hostname)
                )
                "#,
                &[],
            )
            .await?;

        client
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_hostnames_domain_id ON hostnames(domain_id)",
                &[],
            )
            .await?;

        client
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_domains_owner ON domains(owner_id)",
                &[],
            )
            .await?;

        info!("Domain store schema initialized");
        Ok(())
    }
}

#[async_trait]
impl DomainStore for PgDomainStore {
    async fn find_domain(&self, name: &str, owner: &str) -> ReconResult<Option<DomainId>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id FROM domains WHERE owner_id = $1 AND name = $2",
                &[&owner, &name],
            )
            .await?;
        Ok(row.map(|r| r.get::<_, i64>(0)))
    }

    async fn create_domain(&self, name: &str, owner: &str) -> ReconResult<DomainId> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO domains (owner_id, name)
                VALUES ($1, $2)
                ON CONFLICT (owner_id, name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
                &[&owner, &name],
            )
            .await?;
        Ok(row.get::<_, i64>(0))
    }

    async fn list_hostnames(&self, domain_id: DomainId) -> ReconResult<BTreeSet<String>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT hostname FROM hostnames WHERE domain_id = $1",
                &[&domain_id],
            )
            .await?;
        Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect())
    }

    async fn insert_hostnames_if_absent(
        &self,
        domain_id: DomainId,
        hosts: &BTreeSet<String>,
    ) -> ReconResult<u64> {
        if hosts.is_empty() {
            return Ok(0);
        }

        let mut client = self.pool.get().await?;
        // Single transaction per reconciliation batch; dropping an
        // uncommitted transaction rolls back any partial writes.
        let transaction = client.transaction().await?;

        let mut inserted = 0u64;
        for host in hosts {
            inserted += transaction
                .execute(
                    r#"
                    INSERT INTO hostnames (domain_id, hostname)
                    VALUES ($1, $2)
                    ON CONFLICT (domain_id, hostname) DO NOTHING
                    "#,
                    &[&domain_id, &host],
                )
                .await?;
        }

        transaction.commit().await?;

        debug!(
            domain_id = domain_id,
            batch = hosts.len(),
            inserted = inserted,
            "Hostname batch persisted"
        );

        Ok(inserted)
    }
}

/// In-memory store with the same semantics, used by tests and cacheless
/// single-process deployments
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: DomainId,
    domains: HashMap<(String, String), DomainId>,
    hostnames: HashMap<DomainId, BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn find_domain(&self, name: &str, owner: &str) -> ReconResult<Option<DomainId>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .domains
            .get(&(owner.to_string(), name.to_string()))
            .copied())
    }

    async fn create_domain(&self, name: &str, owner: &str) -> ReconResult<DomainId> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let key = (owner.to_string(), name.to_string());
        if let Some(id) = inner.domains.get(&key) {
            return Ok(*id);
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.domains.insert(key, id);
        inner.hostnames.insert(id, BTreeSet::new());
        Ok(id)
    }

    async fn list_hostnames(&self, domain_id: DomainId) -> ReconResult<BTreeSet<String>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .hostnames
            .get(&domain_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_hostnames_if_absent(
        &self,
        domain_id: DomainId,
        hosts: &BTreeSet<String>,
    ) -> ReconResult<u64> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let existing = inner
            .hostnames
            .get_mut(&domain_id)
            .ok_or_else(|| StoreError::Other(format!("unknown domain id {}", domain_id)))?;

        let mut inserted = 0u64;
        for host in hosts {
            if existing.insert(host.clone()) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_create_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.create_domain("example.com", "user-1").await.unwrap();
        let b = store.create_domain("example.com", "user-1").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_memory_store_scopes_by_owner() {
        let store = MemoryStore::new();
        let a = store.create_domain("example.com", "user-1").await.unwrap();
        let b = store.create_domain("example.com", "user-2").await.unwrap();
        assert_ne!(a, b);

        assert_eq!(
            store.find_domain("example.com", "user-1").await.unwrap(),
            Some(a)
        );
        assert_eq!(store.find_domain("example.com", "user-3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_insert_if_absent() {
        let store = MemoryStore::new();
        let id = store.create_domain("example.com", "user-1").await.unwrap();

        let mut batch = BTreeSet::new();
        batch.insert("www.example.com".to_string());
        batch.insert("api.example.com".to_string());

        assert_eq!(store.insert_hostnames_if_absent(id, &batch).await.unwrap(), 2);
        // Re-running the same batch inserts nothing
        assert_eq!(store.insert_hostnames_if_absent(id, &batch).await.unwrap(), 0);
        assert_eq!(store.list_hostnames(id).await.unwrap().len(), 2);
    }
}
