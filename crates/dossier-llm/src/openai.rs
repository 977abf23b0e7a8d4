use async_trait::async_trait;
use dossier_common::{DossierError, Result};
use serde::{Deserialize, Serialize};

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

/// Chat-completions client for OpenAI and OpenAI-compatible endpoints.
/// Carries the native `response_format` knob the extraction oracle uses to
/// force JSON-shaped output.
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: Option<String>, model: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn role_to_string(role: &Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    fn build_messages(request: &LlmRequest) -> Vec<OpenAiMessage> {
        let mut messages = Vec::new();
        if let Some(ref system) = request.system_prompt {
            messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        for msg in &request.messages {
            messages.push(OpenAiMessage {
                role: Self::role_to_string(&msg.role).to_string(),
                content: msg.content.clone(),
            });
        }
        messages
    }

    fn build_request_body(&self, request: &LlmRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: Self::build_messages(request),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let body = self.build_request_body(&request);
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut http_request = self.http_client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| DossierError::Oracle(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(DossierError::Oracle(format!(
                "OpenAI API error {status}: {body_text}"
            )));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| DossierError::Oracle(format!("Failed to parse OpenAI response: {e}")))?;

        let content = openai_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DossierError::Oracle("OpenAI response had no choices".to_string()))?;

        Ok(LlmResponse {
            content,
            model: openai_response.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
