//! Assessment reports over the knowledge graph.
//!
//! Reads persisted observations back and aggregates them: skills grouped
//! by domain with a "strong domain" threshold, traits resolved to a single
//! overall intensity, and per-domain deep dives. Readers tolerate
//! concurrently in-flight cold-path writes; a report is a snapshot of
//! whatever the graph holds right now.

pub mod service;
pub mod types;

pub use service::{resolve_intensity, ReportService, STRONG_DOMAIN_THRESHOLD};
pub use types::{
    CandidateReport, DeepDiveItem, DomainDeepDive, ReportSummary, SkillsReport, SkillSummary,
    TraitsReport, TraitSummary,
};
