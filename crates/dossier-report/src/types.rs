//! Report response shapes.

use chrono::{DateTime, Utc};
use dossier_common::Intensity;
use serde::Serialize;
use std::collections::BTreeMap;

/// One skill with its supporting evidence.
#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub skill: String,
    pub evidence_count: usize,
    pub evidence_points: Vec<String>,
}

/// Skills grouped by domain, with the domains that cleared the strength
/// threshold.
#[derive(Debug, Clone, Serialize)]
pub struct SkillsReport {
    pub session_id: String,
    pub skills_by_domain: BTreeMap<String, Vec<SkillSummary>>,
    pub strong_domains: Vec<String>,
}

/// One trait with its resolved overall intensity.
#[derive(Debug, Clone, Serialize)]
pub struct TraitSummary {
    pub trait_name: String,
    pub intensity: Intensity,
    pub evidence_count: usize,
    pub evidence_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraitsReport {
    pub session_id: String,
    pub traits: Vec<TraitSummary>,
}

/// One timestamped piece of evidence inside a deep dive.
#[derive(Debug, Clone, Serialize)]
pub struct DeepDiveItem {
    pub evidence: String,
    pub timestamp: DateTime<Utc>,
}

/// Detailed per-skill evidence for a single domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainDeepDive {
    pub domain: String,
    pub skills: BTreeMap<String, Vec<DeepDiveItem>>,
}

/// Headline statistics for the full candidate report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_skill_evidence: usize,
    pub total_trait_evidence: usize,
    pub strong_domains: Vec<String>,
    pub skills_demonstrated: usize,
    pub traits_identified: usize,
}

/// The complete assessment report for a candidate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub session_id: String,
    pub summary: ReportSummary,
    pub skills_by_domain: BTreeMap<String, Vec<SkillSummary>>,
    pub traits: Vec<TraitSummary>,
}
