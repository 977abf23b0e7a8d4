//! Cold-path extraction for Dossier.
//!
//! The hot path enqueues one task per substantial turn and moves on. A
//! worker pool consumes the queue: each task runs the oracle extraction,
//! filters the output against the ontology, and persists what survives.
//! Transient failures retry on a fixed backoff; exhausted tasks land on a
//! dead-letter list and never surface to the conversation.
//!
//! ```text
//! hot path ──dispatch──▶ queue ──▶ workers ──▶ extract ──▶ validate ──▶ persist
//!                                    │
//!                                    └─ retry (3 × 5s) ──▶ dead letters
//! ```

pub mod dispatch;
pub mod extract;
pub mod pipeline;
pub mod validate;

pub use dispatch::{spawn_pool, DispatchConfig, ExtractionHandler, TaskDispatcher, WorkerPool};
pub use extract::ObservationExtractor;
pub use pipeline::ExtractionPipeline;
pub use validate::validate;
