use std::sync::Arc;

use dossier_common::{DossierError, Result};
use serde::{Deserialize, Serialize};

use crate::anthropic::AnthropicClient;
use crate::client::LlmClient;
use crate::openai::OpenAiClient;

/// Provider configuration for one oracle (reply or extraction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type: "openai" or "anthropic"
    pub provider: String,

    /// Model name
    pub model: String,

    /// API key; when absent, resolved from the provider's environment
    /// variable (OPENAI_API_KEY / ANTHROPIC_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint override (OpenAI-compatible local endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        let env_var = match self.provider.as_str() {
            "openai" => "OPENAI_API_KEY",
            "anthropic" => "ANTHROPIC_API_KEY",
            _ => return None,
        };

        std::env::var(env_var).ok()
    }
}

/// Build a client for the configured provider. Unknown providers and a
/// keyless Anthropic configuration are configuration errors.
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match config.provider.as_str() {
        "openai" => Arc::new(OpenAiClient::new(
            config.api_url.clone(),
            config.model.clone(),
            config.resolve_api_key(),
        )),
        "anthropic" => {
            let api_key = config
                .resolve_api_key()
                .ok_or_else(|| DossierError::Config("Anthropic requires an API key".to_string()))?;
            Arc::new(AnthropicClient::new(config.model.clone(), api_key))
        }
        other => {
            return Err(DossierError::Config(format!(
                "Unknown LLM provider: {other}"
            )));
        }
    };

    Ok(client)
}
