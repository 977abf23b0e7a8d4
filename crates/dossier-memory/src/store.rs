//! The list-store seam the recency buffer runs on.

use async_trait::async_trait;
use dossier_common::Result;
use std::time::Duration;

/// Ordered list store with per-key TTL.
///
/// Exactly the primitives the buffer needs: push-front, trim-to-N,
/// set-expiry, range-read, length, TTL-read, key-delete. Lists are
/// newest-first; an expired key behaves like an absent one.
#[async_trait]
pub trait RecencyStore: Send + Sync {
    /// Push a value to the front of the list, creating the key if absent.
    async fn push_front(&self, key: &str, value: &str) -> Result<()>;

    /// Drop everything beyond the first `max_len` values.
    async fn trim(&self, key: &str, max_len: usize) -> Result<()>;

    /// Set the key's expiry, replacing any previous one.
    async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Read up to `limit` values from the front (newest first).
    async fn range(&self, key: &str, limit: usize) -> Result<Vec<String>>;

    /// Number of values under the key (0 if absent).
    async fn len(&self, key: &str) -> Result<usize>;

    /// Remaining TTL, or `None` if the key is absent or has no expiry.
    async fn ttl_remaining(&self, key: &str) -> Result<Option<Duration>>;

    /// Delete the key. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool>;
}
