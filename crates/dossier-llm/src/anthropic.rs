use async_trait::async_trait;
use dossier_common::{DossierError, Result};
use serde::{Deserialize, Serialize};

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct AnthropicMessage {
    role: String,
    content: Vec<AnthropicContent>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
}

/// Messages-API client. Anthropic has no JSON response-format knob, so the
/// `json_response` flag rides on the instructions alone.
pub struct AnthropicClient {
    model: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn role_to_string(role: &Role) -> &'static str {
        match role {
            // System content travels in the top-level system field.
            Role::System => "user",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    fn build_messages(messages: &[ChatMessage]) -> Vec<AnthropicMessage> {
        messages
            .iter()
            .filter(|msg| msg.role != Role::System)
            .map(|msg| AnthropicMessage {
                role: Self::role_to_string(&msg.role).to_string(),
                content: vec![AnthropicContent {
                    content_type: "text".to_string(),
                    text: msg.content.clone(),
                }],
            })
            .collect()
    }

    fn build_request_body(&self, request: &LlmRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.model.clone(),
            messages: Self::build_messages(&request.messages),
            system: request.system_prompt.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let body = self.build_request_body(&request);

        let response = self
            .http_client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DossierError::Oracle(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(DossierError::Oracle(format!(
                "Anthropic API error {status}: {body_text}"
            )));
        }

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| DossierError::Oracle(format!("Failed to parse Anthropic response: {e}")))?;

        let content = anthropic_response
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(LlmResponse {
            content,
            model: anthropic_response.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
