//! In-process graph store with optional JSON snapshots.

use async_trait::async_trait;
use chrono::Utc;
use dossier_common::{DossierError, Intensity, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::store::GraphStore;
use crate::types::{
    CandidateNode, DomainEvidenceRow, EvidenceId, EvidenceNode, SkillEvidenceRow, SkillNode,
    TraitEvidenceRow, TraitIndication, TraitNode,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillEdge {
    evidence_id: EvidenceId,
    skill: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TraitEdge {
    evidence_id: EvidenceId,
    trait_name: String,
    intensity: Intensity,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GraphData {
    candidates: HashMap<String, CandidateNode>,
    /// Insertion-ordered; node counts stay small enough that id lookups
    /// walk the list.
    evidence: Vec<EvidenceNode>,
    skills: HashMap<String, SkillNode>,
    traits: HashMap<String, TraitNode>,
    skill_edges: Vec<SkillEdge>,
    trait_edges: Vec<TraitEdge>,
}

impl GraphData {
    fn evidence_by_id(&self, id: EvidenceId) -> Option<&EvidenceNode> {
        self.evidence.iter().find(|e| e.id == id)
    }

    fn session_evidence_ids(&self, session_id: &str) -> Vec<EvidenceId> {
        self.evidence
            .iter()
            .filter(|e| e.session_id == session_id)
            .map(|e| e.id)
            .collect()
    }
}

/// Graph store over a single `RwLock`. Every mutation takes the write
/// guard, so merge-by-name is trivially atomic; concurrent workers racing
/// on the same skill or trait name serialize on the lock and converge on
/// one node.
#[derive(Default)]
pub struct MemoryGraphStore {
    data: RwLock<GraphData>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the whole graph to a JSON snapshot.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.data.read().await;
        let encoded = serde_json::to_vec_pretty(&*data)?;
        tokio::fs::write(path.as_ref(), encoded).await?;
        Ok(())
    }

    /// Load a graph from a JSON snapshot.
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let encoded = tokio::fs::read(path.as_ref()).await?;
        let data: GraphData = serde_json::from_slice(&encoded)?;
        Ok(Self {
            data: RwLock::new(data),
        })
    }

    pub async fn candidate_count(&self) -> usize {
        self.data.read().await.candidates.len()
    }

    pub async fn evidence_count(&self) -> usize {
        self.data.read().await.evidence.len()
    }

    pub async fn skill_count(&self) -> usize {
        self.data.read().await.skills.len()
    }

    pub async fn trait_count(&self) -> usize {
        self.data.read().await.traits.len()
    }

    pub async fn skill_node(&self, name: &str) -> Option<SkillNode> {
        self.data.read().await.skills.get(name).cloned()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn merge_candidate(&self, session_id: &str) -> Result<()> {
        let mut data = self.data.write().await;
        data.candidates
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "Creating Candidate node");
                CandidateNode {
                    session_id: session_id.to_string(),
                    created_at: Utc::now(),
                }
            });
        Ok(())
    }

    async fn create_evidence(&self, session_id: &str, text: &str) -> Result<EvidenceId> {
        let mut data = self.data.write().await;
        if !data.candidates.contains_key(session_id) {
            return Err(DossierError::Graph(format!(
                "No Candidate node for session {session_id}"
            )));
        }

        let node = EvidenceNode {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        let id = node.id;
        data.evidence.push(node);
        Ok(id)
    }

    async fn link_skill(&self, evidence_id: EvidenceId, name: &str, domain: &str) -> Result<()> {
        let mut data = self.data.write().await;
        if data.evidence_by_id(evidence_id).is_none() {
            return Err(DossierError::Graph(format!(
                "No Evidence node {evidence_id}"
            )));
        }

        // Merge-by-name: the domain is written only by the creating writer.
        data.skills
            .entry(name.to_string())
            .or_insert_with(|| SkillNode {
                name: name.to_string(),
                domain: domain.to_string(),
            });
        data.skill_edges.push(SkillEdge {
            evidence_id,
            skill: name.to_string(),
        });
        Ok(())
    }

    async fn link_trait(
        &self,
        evidence_id: EvidenceId,
        name: &str,
        intensity: Intensity,
    ) -> Result<()> {
        let mut data = self.data.write().await;
        if data.evidence_by_id(evidence_id).is_none() {
            return Err(DossierError::Graph(format!(
                "No Evidence node {evidence_id}"
            )));
        }

        data.traits
            .entry(name.to_string())
            .or_insert_with(|| TraitNode {
                name: name.to_string(),
            });
        data.trait_edges.push(TraitEdge {
            evidence_id,
            trait_name: name.to_string(),
            intensity,
        });
        Ok(())
    }

    async fn skills_with_evidence(&self, session_id: &str) -> Result<Vec<SkillEvidenceRow>> {
        let data = self.data.read().await;
        let session_evidence = data.session_evidence_ids(session_id);

        // Group evidence texts per skill, then order by (domain, skill).
        let mut grouped: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
        for edge in &data.skill_edges {
            if !session_evidence.contains(&edge.evidence_id) {
                continue;
            }
            let Some(skill) = data.skills.get(&edge.skill) else {
                continue;
            };
            let Some(evidence) = data.evidence_by_id(edge.evidence_id) else {
                continue;
            };
            grouped
                .entry((skill.domain.clone(), skill.name.clone()))
                .or_default()
                .push(evidence.text.clone());
        }

        Ok(grouped
            .into_iter()
            .map(|((domain, skill), evidence)| SkillEvidenceRow {
                skill,
                domain,
                evidence,
            })
            .collect())
    }

    async fn traits_with_evidence(&self, session_id: &str) -> Result<Vec<TraitEvidenceRow>> {
        let data = self.data.read().await;
        let session_evidence = data.session_evidence_ids(session_id);

        let mut grouped: BTreeMap<String, Vec<TraitIndication>> = BTreeMap::new();
        for edge in &data.trait_edges {
            if !session_evidence.contains(&edge.evidence_id) {
                continue;
            }
            let Some(evidence) = data.evidence_by_id(edge.evidence_id) else {
                continue;
            };
            grouped
                .entry(edge.trait_name.clone())
                .or_default()
                .push(TraitIndication {
                    text: evidence.text.clone(),
                    intensity: edge.intensity,
                });
        }

        Ok(grouped
            .into_iter()
            .map(|(trait_name, indications)| TraitEvidenceRow {
                trait_name,
                indications,
            })
            .collect())
    }

    async fn domain_evidence(
        &self,
        session_id: &str,
        domain: &str,
    ) -> Result<Vec<DomainEvidenceRow>> {
        let data = self.data.read().await;
        let session_evidence = data.session_evidence_ids(session_id);

        let mut rows: Vec<DomainEvidenceRow> = data
            .skill_edges
            .iter()
            .filter(|edge| session_evidence.contains(&edge.evidence_id))
            .filter_map(|edge| {
                let skill = data.skills.get(&edge.skill)?;
                if skill.domain != domain {
                    return None;
                }
                let evidence = data.evidence_by_id(edge.evidence_id)?;
                Some(DomainEvidenceRow {
                    skill: skill.name.clone(),
                    evidence: evidence.text.clone(),
                    timestamp: evidence.created_at,
                })
            })
            .collect();

        rows.sort_by(|a, b| a.skill.cmp(&b.skill).then(a.timestamp.cmp(&b.timestamp)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn merge_candidate_is_idempotent() {
        let store = MemoryGraphStore::new();
        store.merge_candidate("s1").await.unwrap();
        store.merge_candidate("s1").await.unwrap();

        assert_eq!(store.candidate_count().await, 1);
    }

    #[tokio::test]
    async fn candidate_created_at_is_set_once() {
        let store = MemoryGraphStore::new();
        store.merge_candidate("s1").await.unwrap();
        let first = store.data.read().await.candidates["s1"].created_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.merge_candidate("s1").await.unwrap();
        let second = store.data.read().await.candidates["s1"].created_at;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn evidence_requires_a_candidate() {
        let store = MemoryGraphStore::new();
        let err = store.create_evidence("ghost", "quote").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn evidence_is_never_deduplicated() {
        let store = MemoryGraphStore::new();
        store.merge_candidate("s1").await.unwrap();

        let a = store.create_evidence("s1", "same quote").await.unwrap();
        let b = store.create_evidence("s1", "same quote").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.evidence_count().await, 2);
    }

    #[tokio::test]
    async fn skill_domain_is_immutable_after_creation() {
        let store = MemoryGraphStore::new();
        store.merge_candidate("s1").await.unwrap();
        let e1 = store.create_evidence("s1", "first").await.unwrap();
        let e2 = store.create_evidence("s1", "second").await.unwrap();

        store
            .link_skill(e1, "Communication", "Interacting with Others")
            .await
            .unwrap();
        store
            .link_skill(e2, "Communication", "Some Other Domain")
            .await
            .unwrap();

        assert_eq!(store.skill_count().await, 1);
        let node = store.skill_node("Communication").await.unwrap();
        assert_eq!(node.domain, "Interacting with Others");
    }

    #[tokio::test]
    async fn snapshot_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        let store = MemoryGraphStore::new();
        store.merge_candidate("s1").await.unwrap();
        let e = store.create_evidence("s1", "led the rollout").await.unwrap();
        store
            .link_skill(e, "Collaboration", "Interacting with Others")
            .await
            .unwrap();
        store
            .link_trait(e, "Conscientiousness", Intensity::High)
            .await
            .unwrap();
        store.save_to(&path).await.unwrap();

        let restored = MemoryGraphStore::load_from(&path).await.unwrap();
        assert_eq!(restored.candidate_count().await, 1);
        assert_eq!(restored.evidence_count().await, 1);
        assert_eq!(restored.skill_count().await, 1);

        let traits = restored.traits_with_evidence("s1").await.unwrap();
        assert_eq!(traits.len(), 1);
        assert_eq!(traits[0].indications[0].intensity, Intensity::High);
    }
}
