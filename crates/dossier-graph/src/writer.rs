//! Persisting validated observations into the graph.

use dossier_common::{Observation, Result};
use std::sync::Arc;
use tracing::debug;

use crate::store::GraphStore;
use crate::types::EvidenceId;

/// Writes one validated observation as nodes and relationships.
///
/// Each persist is: merge Candidate, create Evidence (always new), link
/// Skill and/or Trait. A failing step aborts the remaining ones and the
/// task-level retry re-runs the whole persist; redelivery can therefore
/// duplicate Evidence nodes, which is accepted. Evidence is append-only
/// and commutative, so duplicates inflate counts without corrupting the
/// graph shape.
#[derive(Clone)]
pub struct GraphWriter {
    store: Arc<dyn GraphStore>,
}

impl GraphWriter {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    pub async fn persist(&self, session_id: &str, observation: &Observation) -> Result<EvidenceId> {
        self.store.merge_candidate(session_id).await?;

        let evidence_id = self
            .store
            .create_evidence(session_id, &observation.evidence)
            .await?;

        if let Some(ref skill) = observation.skill {
            self.store
                .link_skill(evidence_id, &skill.name, &skill.domain)
                .await?;
        }

        if let Some(ref trait_ref) = observation.trait_indication {
            self.store
                .link_trait(
                    evidence_id,
                    &trait_ref.name,
                    trait_ref.intensity.unwrap_or_default(),
                )
                .await?;
        }

        debug!(
            session_id = %session_id,
            evidence_id = %evidence_id,
            skill = observation.skill.as_ref().map(|s| s.name.as_str()),
            trait_name = observation.trait_indication.as_ref().map(|t| t.name.as_str()),
            "Persisted observation"
        );

        Ok(evidence_id)
    }
}
