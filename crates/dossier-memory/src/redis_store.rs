//! Redis-backed recency store.

use async_trait::async_trait;
use dossier_common::{DossierError, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::info;

use crate::store::RecencyStore;

/// Recency store over a Redis list per session key.
///
/// Uses a `ConnectionManager` so the handle is cheap to clone and reconnects
/// transparently; a request that still cannot reach Redis surfaces as a
/// `Memory` error and is fatal to that request only.
#[derive(Clone)]
pub struct RedisRecencyStore {
    conn: ConnectionManager,
}

impl RedisRecencyStore {
    pub async fn connect(url: &str) -> Result<Self> {
        info!(url = %url, "Connecting to Redis recency store");

        let client = redis::Client::open(url)
            .map_err(|e| DossierError::Memory(format!("Invalid Redis URL: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| DossierError::Memory(format!("Redis connection failed: {e}")))?;

        Ok(Self { conn })
    }
}

fn store_err(e: redis::RedisError) -> DossierError {
    DossierError::Memory(format!("Redis command failed: {e}"))
}

#[async_trait]
impl RecencyStore for RedisRecencyStore {
    async fn push_front(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.lpush(key, value).await.map_err(store_err)?;
        Ok(())
    }

    async fn trim(&self, key: &str, max_len: usize) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .ltrim(key, 0, max_len as isize - 1)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .expire(key, ttl.as_secs() as i64)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn range(&self, key: &str, limit: usize) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.lrange(key, 0, limit as isize - 1)
            .await
            .map_err(store_err)
    }

    async fn len(&self, key: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: i64 = conn.llen(key).await.map_err(store_err)?;
        Ok(len.max(0) as usize)
    }

    async fn ttl_remaining(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.conn.clone();
        // TTL returns -2 for a missing key and -1 for a key without expiry.
        let ttl: i64 = conn.ttl(key).await.map_err(store_err)?;
        Ok((ttl > 0).then(|| Duration::from_secs(ttl as u64)))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await.map_err(store_err)?;
        Ok(removed > 0)
    }
}
