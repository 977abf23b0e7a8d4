//! Service configuration.

use dossier_llm::LlmConfig;
use dossier_worker::DispatchConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Recency buffer settings. No `redis_url` means the in-process store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,

    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_max_turns() -> usize {
    dossier_memory::MAX_TURNS
}

fn default_ttl_secs() -> u64 {
    dossier_memory::SESSION_TTL.as_secs()
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_turns: default_max_turns(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Top-level configuration: one oracle for replies, one for extraction,
/// plus buffer, dispatch and server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Reply-generation oracle
    pub reply: LlmConfig,

    /// Classification oracle for the cold path
    pub extraction: LlmConfig,

    #[serde(default)]
    pub recency: RecencyConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Default system prompt for reply generation; requests may override it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            reply: LlmConfig {
                provider: "openai".into(),
                model: "gpt-4o".into(),
                api_key: None,
                api_url: None,
                temperature: Some(0.7),
                max_tokens: Some(500),
            },
            extraction: LlmConfig {
                provider: "openai".into(),
                model: "gpt-4o".into(),
                api_key: None,
                api_url: None,
                temperature: None,
                max_tokens: Some(1000),
            },
            recency: RecencyConfig::default(),
            dispatch: DispatchConfig::default(),
            server: ServerConfig::default(),
            system_prompt: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file. API keys are better left to
    /// the environment; a key found in the file is accepted with a warning.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> dossier_common::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| dossier_common::DossierError::Config(format!("{}: {e}", path.display())))?;

        if config.reply.api_key.is_some() || config.extraction.api_key.is_some() {
            warn!(
                "API key found in config file '{}'. Prefer the OPENAI_API_KEY / \
                 ANTHROPIC_API_KEY environment variables.",
                path.display()
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
system_prompt = "You are conducting a structured interview."

[reply]
provider = "anthropic"
model = "claude-sonnet-4-20250514"
temperature = 0.7
max_tokens = 500

[extraction]
provider = "openai"
model = "gpt-4o"
max_tokens = 1000

[recency]
redis_url = "redis://localhost:6379/0"
max_turns = 20
ttl_secs = 86400

[dispatch]
workers = 8
max_retries = 3
retry_delay_ms = 5000
task_timeout_ms = 30000

[server]
bind = "0.0.0.0"
port = 9090
"#;

    #[test]
    fn deserialize_full_config() {
        let config: ServiceConfig = toml::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.reply.provider, "anthropic");
        assert_eq!(config.extraction.model, "gpt-4o");
        assert_eq!(
            config.recency.redis_url.as_deref(),
            Some("redis://localhost:6379/0")
        );
        assert_eq!(config.recency.ttl_secs, 86_400);
        assert_eq!(config.dispatch.workers, 8);
        assert_eq!(config.server.port, 9090);
        assert!(config.system_prompt.is_some());
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let minimal = r#"
[reply]
provider = "openai"
model = "gpt-4o"

[extraction]
provider = "openai"
model = "gpt-4o"
"#;
        let config: ServiceConfig = toml::from_str(minimal).unwrap();
        assert!(config.recency.redis_url.is_none());
        assert_eq!(config.recency.max_turns, 20);
        assert_eq!(config.dispatch.max_retries, 3);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn default_config_is_self_consistent() {
        let config = ServiceConfig::default();
        assert_eq!(config.recency.ttl_secs, 60 * 60 * 24);
        assert_eq!(config.dispatch.task_timeout_ms, 30_000);
        assert_eq!(config.reply.max_tokens, Some(500));
    }
}
