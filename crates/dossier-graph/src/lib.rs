//! Knowledge graph for extracted observations.
//!
//! One `Candidate` node per session owns append-only `Evidence` nodes;
//! evidence indicates `Skill` nodes (shared across candidates, domain
//! denormalized) and `Trait` nodes (intensity lives on the edge, since the
//! same trait can be indicated at different strengths by different
//! evidence).
//!
//! ```text
//! Candidate ─DEMONSTRATED→ Evidence ─INDICATES→            Skill {domain}
//!                                   ─INDICATES {intensity}→ Trait
//! ```
//!
//! The store is a seam with merge-or-create semantics; the in-memory
//! implementation serializes every mutation behind one write lock, which is
//! what makes concurrent merge-by-name converge to a single node.

pub mod memory;
pub mod store;
pub mod types;
pub mod writer;

pub use memory::MemoryGraphStore;
pub use store::GraphStore;
pub use types::{
    CandidateNode, DomainEvidenceRow, EvidenceId, EvidenceNode, SkillEvidenceRow, SkillNode,
    TraitEvidenceRow, TraitIndication, TraitNode,
};
pub use writer::GraphWriter;
