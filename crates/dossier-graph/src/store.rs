//! The graph store seam.

use async_trait::async_trait;
use dossier_common::{Intensity, Result};

use crate::types::{DomainEvidenceRow, EvidenceId, SkillEvidenceRow, TraitEvidenceRow};

/// Labeled-node store with merge-or-create semantics.
///
/// Every mutation must be atomic: two workers merging the same skill name
/// concurrently must converge on a single node, with the domain set by
/// whichever creation wins. Readers tolerate concurrently in-flight writes
/// (eventual consistency across tasks, not snapshot isolation).
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Ensure a Candidate node exists for the session. The creation
    /// timestamp is set only once.
    async fn merge_candidate(&self, session_id: &str) -> Result<()>;

    /// Create a new Evidence node under the session's Candidate. Always a
    /// fresh node; fails if the Candidate does not exist.
    async fn create_evidence(&self, session_id: &str, text: &str) -> Result<EvidenceId>;

    /// Merge-by-name a Skill node (domain set on create only) and link the
    /// evidence to it.
    async fn link_skill(&self, evidence_id: EvidenceId, name: &str, domain: &str) -> Result<()>;

    /// Merge-by-name a Trait node and link the evidence to it with the
    /// given intensity on the edge.
    async fn link_trait(&self, evidence_id: EvidenceId, name: &str, intensity: Intensity)
        -> Result<()>;

    /// All (skill, domain, evidence texts) for a candidate, ordered by
    /// domain then skill.
    async fn skills_with_evidence(&self, session_id: &str) -> Result<Vec<SkillEvidenceRow>>;

    /// All (trait, indications) for a candidate, ordered by trait name.
    async fn traits_with_evidence(&self, session_id: &str) -> Result<Vec<TraitEvidenceRow>>;

    /// Per-evidence rows restricted to one skill domain, ordered by skill
    /// name then timestamp.
    async fn domain_evidence(
        &self,
        session_id: &str,
        domain: &str,
    ) -> Result<Vec<DomainEvidenceRow>>;
}
