//! The production extraction handler: extract, validate, persist.

use async_trait::async_trait;
use dossier_common::{ExtractionTask, Result};
use dossier_graph::GraphWriter;
use tracing::{debug, info};

use crate::dispatch::ExtractionHandler;
use crate::extract::ObservationExtractor;
use crate::validate::validate;

/// Wires the extractor, the validator, and the graph writer into one
/// handler the worker pool can run. Re-running the same task is safe:
/// merges are idempotent and evidence is append-only (redelivery may add
/// duplicate evidence, which is accepted).
pub struct ExtractionPipeline {
    extractor: ObservationExtractor,
    writer: GraphWriter,
}

impl ExtractionPipeline {
    pub fn new(extractor: ObservationExtractor, writer: GraphWriter) -> Self {
        Self { extractor, writer }
    }
}

#[async_trait]
impl ExtractionHandler for ExtractionPipeline {
    async fn handle(&self, task: &ExtractionTask) -> Result<usize> {
        let raw_observations = self.extractor.extract(&task.text).await?;
        if raw_observations.is_empty() {
            debug!(
                task_id = %task.id,
                session_id = %task.session_id,
                "No observations extracted"
            );
            return Ok(0);
        }

        let mut persisted = 0;
        for raw in raw_observations {
            let Some(observation) = validate(raw, &task.text) else {
                continue;
            };
            self.writer.persist(&task.session_id, &observation).await?;
            persisted += 1;
        }

        info!(
            task_id = %task.id,
            session_id = %task.session_id,
            persisted,
            "Extraction task persisted observations"
        );
        Ok(persisted)
    }
}
