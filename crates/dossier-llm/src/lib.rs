//! Oracle clients for Dossier.
//!
//! Two oracles share one client seam: the reply oracle that answers each
//! conversational turn, and the classification oracle the cold path uses
//! for observation extraction. Transport failures propagate to the caller
//! untouched; retry policy belongs to the task dispatcher, not this layer.

pub mod anthropic;
pub mod client;
pub mod config;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role};
pub use config::{build_llm_client, LlmConfig};
pub use openai::OpenAiClient;
