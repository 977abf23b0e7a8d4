//! Report aggregation over the graph store.

use dossier_common::{Intensity, Result};
use dossier_graph::GraphStore;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{
    CandidateReport, DeepDiveItem, DomainDeepDive, ReportSummary, SkillsReport, SkillSummary,
    TraitsReport, TraitSummary,
};

/// A domain is "strong" once the evidence count across all its skills
/// reaches this threshold.
pub const STRONG_DOMAIN_THRESHOLD: usize = 3;

/// Resolve one overall intensity from the per-evidence intensities.
///
/// Precedence is High > Low > Moderate: any High evidence wins outright,
/// otherwise any Low wins, otherwise Moderate. Low outranking Moderate is
/// deliberate and must not be "fixed": the reports treat a clear low
/// signal as more salient than a middling one.
pub fn resolve_intensity(intensities: &[Intensity]) -> Intensity {
    if intensities.contains(&Intensity::High) {
        Intensity::High
    } else if intensities.contains(&Intensity::Low) {
        Intensity::Low
    } else {
        Intensity::Moderate
    }
}

/// Read-side aggregator. Holds only a graph handle; every report is
/// computed fresh from the store.
#[derive(Clone)]
pub struct ReportService {
    graph: Arc<dyn GraphStore>,
}

impl ReportService {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    /// Skills grouped by domain, with strong domains marked.
    pub async fn skills_report(&self, session_id: &str) -> Result<SkillsReport> {
        let skills_by_domain = self.skills_by_domain(session_id).await?;
        let strong_domains = strong_domains(&skills_by_domain);

        Ok(SkillsReport {
            session_id: session_id.to_string(),
            skills_by_domain,
            strong_domains,
        })
    }

    /// Traits with one resolved intensity each. A trait with no evidence is
    /// simply absent.
    pub async fn traits_report(&self, session_id: &str) -> Result<TraitsReport> {
        Ok(TraitsReport {
            session_id: session_id.to_string(),
            traits: self.trait_summaries(session_id).await?,
        })
    }

    /// Per-skill evidence for one domain, each item timestamped, ordered by
    /// skill name then timestamp.
    pub async fn domain_deep_dive(&self, session_id: &str, domain: &str) -> Result<DomainDeepDive> {
        let rows = self.graph.domain_evidence(session_id, domain).await?;

        let mut skills: BTreeMap<String, Vec<DeepDiveItem>> = BTreeMap::new();
        for row in rows {
            skills.entry(row.skill).or_default().push(DeepDiveItem {
                evidence: row.evidence,
                timestamp: row.timestamp,
            });
        }

        Ok(DomainDeepDive {
            domain: domain.to_string(),
            skills,
        })
    }

    /// The complete assessment report: skills by domain, traits, and
    /// headline statistics.
    pub async fn candidate_report(&self, session_id: &str) -> Result<CandidateReport> {
        let skills_by_domain = self.skills_by_domain(session_id).await?;
        let traits = self.trait_summaries(session_id).await?;

        let total_skill_evidence = skills_by_domain
            .values()
            .flatten()
            .map(|s| s.evidence_count)
            .sum();
        let skills_demonstrated = skills_by_domain.values().map(Vec::len).sum();
        let summary = ReportSummary {
            total_skill_evidence,
            total_trait_evidence: traits.iter().map(|t| t.evidence_count).sum(),
            strong_domains: strong_domains(&skills_by_domain),
            skills_demonstrated,
            traits_identified: traits.len(),
        };

        Ok(CandidateReport {
            session_id: session_id.to_string(),
            summary,
            skills_by_domain,
            traits,
        })
    }

    async fn skills_by_domain(
        &self,
        session_id: &str,
    ) -> Result<BTreeMap<String, Vec<SkillSummary>>> {
        let rows = self.graph.skills_with_evidence(session_id).await?;

        let mut by_domain: BTreeMap<String, Vec<SkillSummary>> = BTreeMap::new();
        for row in rows {
            by_domain.entry(row.domain).or_default().push(SkillSummary {
                skill: row.skill,
                evidence_count: row.evidence.len(),
                evidence_points: row.evidence,
            });
        }
        Ok(by_domain)
    }

    async fn trait_summaries(&self, session_id: &str) -> Result<Vec<TraitSummary>> {
        let rows = self.graph.traits_with_evidence(session_id).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let intensities: Vec<Intensity> =
                    row.indications.iter().map(|i| i.intensity).collect();
                TraitSummary {
                    trait_name: row.trait_name,
                    intensity: resolve_intensity(&intensities),
                    evidence_count: row.indications.len(),
                    evidence_points: row.indications.into_iter().map(|i| i.text).collect(),
                }
            })
            .collect())
    }
}

fn strong_domains(skills_by_domain: &BTreeMap<String, Vec<SkillSummary>>) -> Vec<String> {
    skills_by_domain
        .iter()
        .filter(|(_, skills)| {
            skills.iter().map(|s| s.evidence_count).sum::<usize>() >= STRONG_DOMAIN_THRESHOLD
        })
        .map(|(domain, _)| domain.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_high_wins() {
        assert_eq!(
            resolve_intensity(&[Intensity::High, Intensity::Low]),
            Intensity::High
        );
        assert_eq!(
            resolve_intensity(&[Intensity::Moderate, Intensity::High, Intensity::Moderate]),
            Intensity::High
        );
    }

    #[test]
    fn low_outranks_moderate() {
        assert_eq!(
            resolve_intensity(&[Intensity::Low, Intensity::Moderate]),
            Intensity::Low
        );
    }

    #[test]
    fn all_moderate_stays_moderate() {
        assert_eq!(resolve_intensity(&[Intensity::Moderate]), Intensity::Moderate);
        assert_eq!(
            resolve_intensity(&[Intensity::Moderate, Intensity::Moderate]),
            Intensity::Moderate
        );
    }
}
