use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::{sync::RwLock, time::Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Key-value store used to memoize list responses.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>>;
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// Process-local store with per-entry expiry. Expired entries are dropped on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (Instant, Bytes)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((expires_at, value)) if *expires_at > Instant::now() => {
                    return Ok(Some(value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> anyhow::Result<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (expires_at, value));
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<Bytes>> {
        Ok(None)
    }
    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> anyhow::Result<()> {
        Ok(())
    }
    async fn delete(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Journal,
    Todo,
    Interview,
}

impl ResourceKind {
    fn prefix(self) -> &'static str {
        match self {
            ResourceKind::Journal => "journal",
            ResourceKind::Todo => "todo",
            ResourceKind::Interview => "interview",
        }
    }
}

pub fn list_key(kind: ResourceKind, user_id: Uuid) -> String {
    format!("{}_list_{}", kind.prefix(), user_id)
}

/// Best-effort front for per-user list payloads.
///
/// Store failures are logged and treated as misses; they never fail a request.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Returns the stored payload for `(kind, user_id)` unchanged, or runs
    /// `compute`, stores its output and returns it.
    pub async fn cached_or_compute<F, Fut, E>(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        compute: F,
    ) -> Result<Bytes, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
    {
        let key = list_key(kind, user_id);
        match self.store.get(&key).await {
            Ok(Some(hit)) => {
                debug!(%key, "cache hit");
                return Ok(hit);
            }
            Ok(None) => debug!(%key, "cache miss"),
            Err(e) => warn!(error = %e, %key, "cache get failed; recomputing"),
        }

        let fresh = compute().await?;
        if let Err(e) = self.store.set(&key, fresh.clone(), self.ttl).await {
            warn!(error = %e, %key, "cache set failed");
        }
        Ok(fresh)
    }

    pub async fn invalidate(&self, kind: ResourceKind, user_id: Uuid) {
        let key = list_key(kind, user_id);
        if let Err(e) = self
            .store
            .delete(&key)
            .await
            .with_context(|| format!("delete {key}"))
        {
            warn!(error = %e, "cache invalidation failed");
        }
    }
}
