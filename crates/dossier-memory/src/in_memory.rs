//! In-process recency store for tests and single-node deployments.

use async_trait::async_trait;
use dossier_common::Result;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::store::RecencyStore;

#[derive(Debug)]
struct Entry {
    values: VecDeque<String>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// Recency store over a `HashMap` of per-key lists with `Instant`-based
/// expiry. Expired keys are dropped lazily on the next access, which keeps
/// the observable behavior identical to Redis TTL.
#[derive(Default)]
pub struct InMemoryRecencyStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryRecencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the key if its expiry has passed, then run `f` on what remains.
    async fn with_live_entry<T>(&self, key: &str, f: impl FnOnce(Option<&Entry>) -> T) -> T {
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
        }
        f(entries.get(key))
    }
}

#[async_trait]
impl RecencyStore for InMemoryRecencyStore {
    async fn push_front(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
        }
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            values: VecDeque::new(),
            expires_at: None,
        });
        entry.values.push_front(value.to_string());
        Ok(())
    }

    async fn trim(&self, key: &str, max_len: usize) -> Result<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.values.truncate(max_len);
        }
        Ok(())
    }

    async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn range(&self, key: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .with_live_entry(key, |entry| {
                entry
                    .map(|e| e.values.iter().take(limit).cloned().collect())
                    .unwrap_or_default()
            })
            .await)
    }

    async fn len(&self, key: &str) -> Result<usize> {
        Ok(self
            .with_live_entry(key, |entry| entry.map_or(0, |e| e.values.len()))
            .await)
    }

    async fn ttl_remaining(&self, key: &str) -> Result<Option<Duration>> {
        Ok(self
            .with_live_entry(key, |entry| {
                entry
                    .and_then(|e| e.expires_at)
                    .map(|at| at.saturating_duration_since(Instant::now()))
            })
            .await)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let existed = entries
            .remove(key)
            .is_some_and(|entry| !entry.is_expired());
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_and_range_are_newest_first() {
        let store = InMemoryRecencyStore::new();
        store.push_front("k", "first").await.unwrap();
        store.push_front("k", "second").await.unwrap();

        let values = store.range("k", 10).await.unwrap();
        assert_eq!(values, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn trim_drops_the_oldest() {
        let store = InMemoryRecencyStore::new();
        for i in 0..5 {
            store.push_front("k", &format!("v{i}")).await.unwrap();
        }
        store.trim("k", 3).await.unwrap();

        let values = store.range("k", 10).await.unwrap();
        assert_eq!(values, vec!["v4", "v3", "v2"]);
    }

    #[tokio::test]
    async fn expired_key_behaves_like_absent() {
        let store = InMemoryRecencyStore::new();
        store.push_front("k", "v").await.unwrap();
        store.set_expiry("k", Duration::from_millis(10)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.len("k").await.unwrap(), 0);
        assert!(store.range("k", 10).await.unwrap().is_empty());
        assert_eq!(store.ttl_remaining("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = InMemoryRecencyStore::new();
        assert!(!store.delete("missing").await.unwrap());

        store.push_front("k", "v").await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert_eq!(store.len("k").await.unwrap(), 0);
    }
}
