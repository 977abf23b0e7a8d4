//! Oracle-backed observation extraction.

use dossier_common::{RawObservation, Result};
use dossier_llm::{ChatMessage, LlmClient, LlmRequest, Role};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const EXTRACTION_MAX_TOKENS: u32 = 1000;

/// Calls the classification oracle with the registry instructions and
/// parses its JSON reply into raw candidates.
///
/// The oracle is instructed to skip ambiguous content rather than force a
/// classification; the extractor does not second-guess that. Vocabulary is
/// enforced downstream by the validator.
pub struct ObservationExtractor {
    client: Arc<dyn LlmClient>,
    instructions: String,
}

impl ObservationExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            instructions: dossier_ontology::extraction_instructions(),
        }
    }

    /// Extract raw observations from a text fragment.
    ///
    /// Malformed oracle output (unparseable, wrong shape) is zero
    /// observations, not an error. Transport failures propagate so the
    /// dispatcher's retry policy applies.
    pub async fn extract(&self, text: &str) -> Result<Vec<RawObservation>> {
        let request = LlmRequest {
            system_prompt: Some(self.instructions.clone()),
            messages: vec![ChatMessage {
                role: Role::User,
                content: format!("Analyze this candidate response:\n\n\"{text}\""),
            }],
            temperature: None,
            max_tokens: Some(EXTRACTION_MAX_TOKENS),
            json_response: true,
        };

        let response = self.client.complete(request).await?;
        let observations = parse_observations(&response.content);
        debug!(
            count = observations.len(),
            model = %response.model,
            "Oracle extraction returned"
        );
        Ok(observations)
    }
}

/// Tolerant parse of the oracle reply. Accepts an `{"observations": [...]}`
/// envelope, a bare array, or a single observation object.
fn parse_observations(content: &str) -> Vec<RawObservation> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "Oracle returned unparseable output; treating as zero observations");
            return Vec::new();
        }
    };

    let candidates = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("observations") {
            Some(Value::Array(items)) => items,
            Some(single) => vec![single],
            None => vec![Value::Object(map)],
        },
        other => {
            warn!(?other, "Oracle returned a non-object payload");
            return Vec::new();
        }
    };

    candidates
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dossier_common::DossierError;
    use dossier_llm::LlmResponse;

    /// Oracle fake that replays a fixed reply (or a transport failure).
    struct ScriptedOracle {
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl LlmClient for ScriptedOracle {
        async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
            match &self.reply {
                Ok(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: "scripted".to_string(),
                }),
                Err(message) => Err(DossierError::Oracle(message.clone())),
            }
        }
        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn extractor(reply: std::result::Result<&str, &str>) -> ObservationExtractor {
        ObservationExtractor::new(Arc::new(ScriptedOracle {
            reply: reply.map(str::to_string).map_err(str::to_string),
        }))
    }

    #[tokio::test]
    async fn parses_observations_envelope() {
        let extractor = extractor(Ok(
            r#"{"observations": [{"skill": "Collaboration", "evidence": "we shipped it together"}]}"#,
        ));
        let observations = extractor.extract("some text").await.unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].skill.as_deref(), Some("Collaboration"));
    }

    #[tokio::test]
    async fn parses_bare_array() {
        let extractor = extractor(Ok(
            r#"[{"trait": "Openness", "evidence": "tried a new stack"}, {"skill": "Influence", "evidence": "persuaded the team"}]"#,
        ));
        let observations = extractor.extract("some text").await.unwrap();
        assert_eq!(observations.len(), 2);
    }

    #[tokio::test]
    async fn parses_single_object() {
        let extractor = extractor(Ok(
            r#"{"skill": "Communication", "evidence": "presented the findings"}"#,
        ));
        let observations = extractor.extract("some text").await.unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].skill.as_deref(), Some("Communication"));
    }

    #[tokio::test]
    async fn malformed_output_is_zero_observations() {
        let extractor = extractor(Ok("The candidate seems nice."));
        let observations = extractor.extract("some text").await.unwrap();
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let extractor = extractor(Err("connection refused"));
        let result = extractor.extract("some text").await;
        assert!(result.is_err());
    }

    #[test]
    fn non_object_items_are_skipped() {
        let observations =
            parse_observations(r#"{"observations": ["just a string", {"skill": "Influence"}]}"#);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].skill.as_deref(), Some("Influence"));
    }
}
