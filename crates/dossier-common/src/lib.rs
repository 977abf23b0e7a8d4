//! Common types and errors shared across Dossier crates.
//!
//! This crate provides the foundational vocabulary the hot path, the
//! extraction pipeline, and the report layer use to communicate: turns,
//! observations, extraction tasks, and the workspace error type.

pub mod error;
pub mod observation;
pub mod task;
pub mod turn;

pub use error::{DossierError, Result};
pub use observation::{Intensity, Observation, RawObservation, SkillRef, TraitRef};
pub use task::{ExtractionTask, TaskStatus};
pub use turn::{Turn, TurnRole};
