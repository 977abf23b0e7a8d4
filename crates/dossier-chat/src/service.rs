//! The per-turn conversation service.

use dossier_common::{Result, Turn, TurnRole};
use dossier_llm::{ChatMessage, LlmClient, LlmRequest};
use dossier_memory::{RecencyBuffer, SessionInfo, MAX_TURNS};
use dossier_worker::TaskDispatcher;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::gate::should_extract;

/// Orchestrates one conversational turn end to end.
///
/// All collaborators are injected at construction; the service holds no
/// hidden globals. The dispatcher hand-off is fire-and-forget: the reply
/// never waits on extraction, and a failed enqueue only loses that one
/// analysis, not the conversation.
#[derive(Clone)]
pub struct ChatService {
    buffer: RecencyBuffer,
    dispatcher: TaskDispatcher,
    reply_client: Arc<dyn LlmClient>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatService {
    pub fn new(
        buffer: RecencyBuffer,
        dispatcher: TaskDispatcher,
        reply_client: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            buffer,
            dispatcher,
            reply_client,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_reply_params(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Handle one incoming user turn and produce the reply.
    ///
    /// Buffer the turn, enqueue extraction when the turn is substantial,
    /// generate the reply from recent context, buffer the reply. A store
    /// or reply-oracle failure surfaces as an error for this request; the
    /// conversation itself stays intact.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        message: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        self.buffer
            .append(session_id, TurnRole::User, message)
            .await?;

        if should_extract(message) {
            // Fire and forget; losing the enqueue must not fail the turn.
            if let Err(error) = self.dispatcher.dispatch(session_id, message) {
                warn!(session_id = %session_id, %error, "Failed to enqueue extraction task");
            }
        } else {
            debug!(session_id = %session_id, "Turn below extraction threshold");
        }

        let history = self.buffer.read(session_id, MAX_TURNS).await?;
        let request = self.build_reply_request(history, system_prompt);
        let response = self.reply_client.complete(request).await?;

        self.buffer
            .append(session_id, TurnRole::Assistant, &response.content)
            .await?;

        Ok(response.content)
    }

    /// Turns in chronological order, up to `limit`.
    pub async fn read_history(&self, session_id: &str, limit: usize) -> Result<Vec<Turn>> {
        self.buffer.read(session_id, limit).await
    }

    pub async fn session_info(&self, session_id: &str) -> Result<SessionInfo> {
        self.buffer.info(session_id).await
    }

    /// Drop the session's turns. Already-persisted graph evidence is not
    /// touched.
    pub async fn clear_session(&self, session_id: &str) -> Result<bool> {
        self.buffer.clear(session_id).await
    }

    fn build_reply_request(&self, history: Vec<Turn>, system_prompt: Option<&str>) -> LlmRequest {
        let system = system_prompt
            .map(str::to_string)
            .or_else(|| self.system_prompt.clone());

        LlmRequest {
            system_prompt: system,
            messages: history
                .into_iter()
                .map(|turn| ChatMessage {
                    role: turn.role.into(),
                    content: turn.content,
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_response: false,
        }
    }
}
