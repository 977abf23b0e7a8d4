//! Extraction task types for the cold-path dispatcher.

use serde::{Deserialize, Serialize};

/// Lifecycle of one extraction task.
///
/// `Queued → Running → Succeeded`, with `Running → Retrying → Running` on
/// transient failure and `Retrying → DeadLettered` once the retry cap is
/// exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Running,
    Retrying,
    Succeeded,
    DeadLettered,
}

/// One unit of cold-path work: a single turn to analyze for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionTask {
    /// Unique task ID
    pub id: String,

    /// Session the turn belongs to
    pub session_id: String,

    /// Verbatim turn text to analyze
    pub text: String,

    /// Current status
    pub status: TaskStatus,

    /// Attempts so far (0 until the first run starts)
    pub attempt: u32,

    /// Creation timestamp (Unix millis)
    pub created_at: u64,

    /// Last status change timestamp
    pub updated_at: u64,
}

impl ExtractionTask {
    pub fn new(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        let now = now_millis();

        Self {
            id: format!("task_{}", uuid::Uuid::new_v4()),
            session_id: session_id.into(),
            text: text.into(),
            status: TaskStatus::Queued,
            attempt: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = now_millis();
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
