//! Graph node types and query row shapes.

use chrono::{DateTime, Utc};
use dossier_common::Intensity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique id of an Evidence node.
pub type EvidenceId = Uuid;

/// One per session; created on the first successful observation write and
/// never deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateNode {
    pub session_id: String,
    /// Set once, on creation.
    pub created_at: DateTime<Utc>,
}

/// An immutable persisted quote. Owned by exactly one Candidate; never
/// deduplicated, since identical quotes from different turns are distinct
/// facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceNode {
    pub id: EvidenceId,
    pub session_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Merge-by-name skill node, shared across all candidates. The domain is
/// set on first creation and treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillNode {
    pub name: String,
    pub domain: String,
}

/// Merge-by-name trait node, shared across all candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitNode {
    pub name: String,
}

/// Query row: one skill with all its evidence texts for a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEvidenceRow {
    pub skill: String,
    pub domain: String,
    pub evidence: Vec<String>,
}

/// One trait indication: the quoted text and the edge intensity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitIndication {
    pub text: String,
    pub intensity: Intensity,
}

/// Query row: one trait with all its indications for a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitEvidenceRow {
    pub trait_name: String,
    pub indications: Vec<TraitIndication>,
}

/// Query row: one piece of evidence within a domain deep dive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvidenceRow {
    pub skill: String,
    pub evidence: String,
    pub timestamp: DateTime<Utc>,
}
