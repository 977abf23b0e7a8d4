//! Bounded, time-limited buffer of recent turns per session.

use dossier_common::{Result, Turn, TurnRole};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::store::RecencyStore;

/// Turns kept per session; insertion beyond the cap evicts the oldest.
pub const MAX_TURNS: usize = 20;

/// Rolling session expiry, refreshed on every append.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

const KEY_PREFIX: &str = "chat:";

/// Snapshot of a session's buffer state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub turn_count: usize,
    /// Remaining TTL in seconds; `None` when the session is absent or has
    /// no expiry set.
    pub ttl_seconds: Option<u64>,
    pub exists: bool,
}

/// Per-session bounded store of recent turns.
///
/// Newest-first internally (push-front lists), exposed chronologically.
/// Absence of the buffer is equivalent to an empty, non-existent session.
#[derive(Clone)]
pub struct RecencyBuffer {
    store: Arc<dyn RecencyStore>,
    max_turns: usize,
    ttl: Duration,
}

impl RecencyBuffer {
    pub fn new(store: Arc<dyn RecencyStore>) -> Self {
        Self::with_limits(store, MAX_TURNS, SESSION_TTL)
    }

    pub fn with_limits(store: Arc<dyn RecencyStore>, max_turns: usize, ttl: Duration) -> Self {
        Self {
            store,
            max_turns,
            ttl,
        }
    }

    fn key(session_id: &str) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }

    /// Push a turn, trim to the cap, and reset the session expiry clock.
    /// Appending is the only operation that refreshes the TTL.
    pub async fn append(&self, session_id: &str, role: TurnRole, content: &str) -> Result<()> {
        let key = Self::key(session_id);
        let turn = Turn {
            role,
            content: content.to_string(),
        };
        let encoded = serde_json::to_string(&turn)?;

        self.store.push_front(&key, &encoded).await?;
        self.store.trim(&key, self.max_turns).await?;
        self.store.set_expiry(&key, self.ttl).await?;

        debug!(session_id = %session_id, role = ?role, "Appended turn to recency buffer");
        Ok(())
    }

    /// Turns in chronological order (oldest first), up to `limit`.
    pub async fn read(&self, session_id: &str, limit: usize) -> Result<Vec<Turn>> {
        let raw = self.store.range(&Self::key(session_id), limit).await?;

        // The store hands back newest first; callers get insertion order.
        let mut turns = raw
            .iter()
            .map(|encoded| serde_json::from_str(encoded))
            .collect::<std::result::Result<Vec<Turn>, _>>()?;
        turns.reverse();
        Ok(turns)
    }

    pub async fn info(&self, session_id: &str) -> Result<SessionInfo> {
        let key = Self::key(session_id);
        let turn_count = self.store.len(&key).await?;
        let ttl = self.store.ttl_remaining(&key).await?;

        Ok(SessionInfo {
            session_id: session_id.to_string(),
            turn_count,
            ttl_seconds: ttl.map(|d| d.as_secs()),
            exists: turn_count > 0,
        })
    }

    /// Delete all turns for the session. Returns whether anything existed.
    pub async fn clear(&self, session_id: &str) -> Result<bool> {
        self.store.delete(&Self::key(session_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryRecencyStore;

    fn buffer() -> RecencyBuffer {
        RecencyBuffer::new(Arc::new(InMemoryRecencyStore::new()))
    }

    #[tokio::test]
    async fn read_returns_chronological_order() {
        let buffer = buffer();
        buffer.append("s", TurnRole::User, "first").await.unwrap();
        buffer
            .append("s", TurnRole::Assistant, "second")
            .await
            .unwrap();
        buffer.append("s", TurnRole::User, "third").await.unwrap();

        let turns = buffer.read("s", MAX_TURNS).await.unwrap();
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn buffer_never_exceeds_the_cap() {
        let buffer = buffer();
        for i in 0..30 {
            buffer
                .append("s", TurnRole::User, &format!("turn {i}"))
                .await
                .unwrap();
        }

        let info = buffer.info("s").await.unwrap();
        assert_eq!(info.turn_count, MAX_TURNS);

        // The oldest ten were evicted; the survivors stay chronological.
        let turns = buffer.read("s", MAX_TURNS).await.unwrap();
        assert_eq!(turns.len(), MAX_TURNS);
        assert_eq!(turns[0].content, "turn 10");
        assert_eq!(turns[19].content, "turn 29");
    }

    #[tokio::test]
    async fn read_respects_limit() {
        let buffer = buffer();
        for i in 0..5 {
            buffer
                .append("s", TurnRole::User, &format!("turn {i}"))
                .await
                .unwrap();
        }

        // With a limit, the most recent turns win, still oldest-first.
        let turns = buffer.read("s", 2).await.unwrap();
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["turn 3", "turn 4"]);
    }

    #[tokio::test]
    async fn append_resets_expiry() {
        let store = Arc::new(InMemoryRecencyStore::new());
        let buffer = RecencyBuffer::with_limits(
            store.clone(),
            MAX_TURNS,
            Duration::from_millis(50),
        );

        buffer.append("s", TurnRole::User, "one").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        // A fresh append pushes the expiry out again.
        buffer.append("s", TurnRole::User, "two").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let info = buffer.info("s").await.unwrap();
        assert!(info.exists);
        assert_eq!(info.turn_count, 2);
    }

    #[tokio::test]
    async fn reading_does_not_refresh_expiry() {
        let store = Arc::new(InMemoryRecencyStore::new());
        let buffer =
            RecencyBuffer::with_limits(store, MAX_TURNS, Duration::from_millis(40));

        buffer.append("s", TurnRole::User, "one").await.unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;

        let _ = buffer.read("s", MAX_TURNS).await.unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;

        let info = buffer.info("s").await.unwrap();
        assert!(!info.exists);
    }

    #[tokio::test]
    async fn missing_session_reads_empty() {
        let buffer = buffer();
        let turns = buffer.read("nobody", MAX_TURNS).await.unwrap();
        assert!(turns.is_empty());

        let info = buffer.info("nobody").await.unwrap();
        assert!(!info.exists);
        assert_eq!(info.turn_count, 0);
        assert_eq!(info.ttl_seconds, None);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let buffer = buffer();
        buffer.append("s", TurnRole::User, "hello").await.unwrap();

        assert!(buffer.clear("s").await.unwrap());
        assert!(!buffer.clear("s").await.unwrap());

        let info = buffer.info("s").await.unwrap();
        assert!(!info.exists);
    }
}
