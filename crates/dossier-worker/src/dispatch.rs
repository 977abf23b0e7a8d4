//! Fire-and-forget task dispatch and the worker pool.

use async_trait::async_trait;
use dossier_common::{DossierError, ExtractionTask, Result, TaskStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Retry and timeout policy for extraction tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Worker tasks consuming the queue
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Re-runs after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-attempt execution bound; exceeding it counts as a failure
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,
}

fn default_workers() -> usize {
    4
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5_000
}

fn default_task_timeout_ms() -> u64 {
    30_000
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            task_timeout_ms: default_task_timeout_ms(),
        }
    }
}

/// What a worker runs for each task. Returns how many observations were
/// persisted. Any error is treated as transient and retried up to the cap.
#[async_trait]
pub trait ExtractionHandler: Send + Sync {
    async fn handle(&self, task: &ExtractionTask) -> Result<usize>;
}

/// Hot-path handle onto the queue. Enqueueing never waits on the cold
/// path; the channel is unbounded so `dispatch` cannot block a turn.
#[derive(Clone)]
pub struct TaskDispatcher {
    sender: mpsc::UnboundedSender<ExtractionTask>,
}

impl TaskDispatcher {
    pub fn dispatch(&self, session_id: &str, text: &str) -> Result<()> {
        let task = ExtractionTask::new(session_id, text);
        debug!(task_id = %task.id, session_id = %session_id, "Enqueueing extraction task");
        self.sender
            .send(task)
            .map_err(|e| DossierError::Dispatch(format!("Task queue closed: {e}")))
    }
}

/// The consuming side: N workers sharing one receiver. Tasks for different
/// sessions run fully in parallel; no ordering is enforced between tasks of
/// the same session.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    dead_letters: Arc<RwLock<Vec<ExtractionTask>>>,
}

impl WorkerPool {
    /// Tasks that exhausted their retries.
    pub async fn dead_letters(&self) -> Vec<ExtractionTask> {
        self.dead_letters.read().await.clone()
    }

    /// Wait for all workers to drain and exit. Only returns once every
    /// dispatcher clone has been dropped and the queue is empty.
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// Spawn the worker pool and hand back the dispatch side.
pub fn spawn_pool(
    config: DispatchConfig,
    handler: Arc<dyn ExtractionHandler>,
) -> (TaskDispatcher, WorkerPool) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let receiver = Arc::new(Mutex::new(receiver));
    let dead_letters = Arc::new(RwLock::new(Vec::new()));

    info!(workers = config.workers, "Spawning extraction worker pool");

    let handles = (0..config.workers)
        .map(|worker_id| {
            let config = config.clone();
            let receiver = Arc::clone(&receiver);
            let handler = Arc::clone(&handler);
            let dead_letters = Arc::clone(&dead_letters);
            tokio::spawn(async move {
                worker_loop(worker_id, config, receiver, handler, dead_letters).await;
            })
        })
        .collect();

    (
        TaskDispatcher { sender },
        WorkerPool {
            handles,
            dead_letters,
        },
    )
}

async fn worker_loop(
    worker_id: usize,
    config: DispatchConfig,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<ExtractionTask>>>,
    handler: Arc<dyn ExtractionHandler>,
    dead_letters: Arc<RwLock<Vec<ExtractionTask>>>,
) {
    loop {
        // Hold the receiver lock only while waiting, never while working,
        // so the other workers keep draining the queue.
        let task = { receiver.lock().await.recv().await };
        let Some(mut task) = task else {
            debug!(worker_id, "Task queue closed, worker exiting");
            break;
        };

        if !run_task(&config, handler.as_ref(), &mut task).await {
            dead_letters.write().await.push(task);
        }
    }
}

/// Run one task through the retry state machine. Returns whether it
/// eventually succeeded.
async fn run_task(
    config: &DispatchConfig,
    handler: &dyn ExtractionHandler,
    task: &mut ExtractionTask,
) -> bool {
    let timeout = Duration::from_millis(config.task_timeout_ms);

    loop {
        task.attempt += 1;
        task.mark(TaskStatus::Running);

        match tokio::time::timeout(timeout, handler.handle(task)).await {
            Ok(Ok(persisted)) => {
                task.mark(TaskStatus::Succeeded);
                info!(
                    task_id = %task.id,
                    session_id = %task.session_id,
                    attempt = task.attempt,
                    persisted,
                    "Extraction task succeeded"
                );
                return true;
            }
            Ok(Err(e)) => {
                warn!(
                    task_id = %task.id,
                    attempt = task.attempt,
                    error = %e,
                    "Extraction task failed"
                );
            }
            Err(_) => {
                warn!(
                    task_id = %task.id,
                    attempt = task.attempt,
                    timeout_ms = config.task_timeout_ms,
                    "Extraction task timed out"
                );
            }
        }

        if task.attempt > config.max_retries {
            task.mark(TaskStatus::DeadLettered);
            error!(
                task_id = %task.id,
                session_id = %task.session_id,
                attempts = task.attempt,
                "Extraction task dead-lettered"
            );
            return false;
        }

        task.mark(TaskStatus::Retrying);
        tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_config() -> DispatchConfig {
        DispatchConfig {
            workers: 2,
            max_retries: 3,
            retry_delay_ms: 5,
            task_timeout_ms: 100,
        }
    }

    /// Handler that fails a fixed number of times before succeeding.
    struct FlakyHandler {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ExtractionHandler for FlakyHandler {
        async fn handle(&self, _task: &ExtractionTask) -> Result<usize> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(DossierError::Oracle("oracle unreachable".to_string()))
            } else {
                Ok(1)
            }
        }
    }

    /// Handler that never finishes within the task timeout.
    struct HangingHandler;

    #[async_trait]
    impl ExtractionHandler for HangingHandler {
        async fn handle(&self, _task: &ExtractionTask) -> Result<usize> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(0)
        }
    }

    #[test]
    fn default_config_matches_policy() {
        let config = DispatchConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 5_000);
        assert_eq!(config.task_timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn transient_failure_retries_then_succeeds() {
        let handler = Arc::new(FlakyHandler {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let (dispatcher, pool) = spawn_pool(test_config(), handler.clone());

        dispatcher.dispatch("s1", "substantial text").unwrap();
        drop(dispatcher);
        pool_join_with_dead_letters(pool, 0).await;

        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_dead_letter_the_task() {
        let handler = Arc::new(FlakyHandler {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        });
        let (dispatcher, pool) = spawn_pool(test_config(), handler.clone());

        dispatcher.dispatch("s1", "substantial text").unwrap();
        drop(dispatcher);

        let dead = pool.dead_letters.clone();
        pool.join().await;

        let dead = dead.read().await;
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].status, TaskStatus::DeadLettered);
        // Initial attempt plus three retries.
        assert_eq!(dead[0].attempt, 4);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn timeout_counts_as_failure() {
        let config = DispatchConfig {
            workers: 1,
            max_retries: 1,
            retry_delay_ms: 5,
            task_timeout_ms: 20,
        };
        let (dispatcher, pool) = spawn_pool(config, Arc::new(HangingHandler));

        dispatcher.dispatch("s1", "text").unwrap();
        drop(dispatcher);

        let dead = pool.dead_letters.clone();
        pool.join().await;
        assert_eq!(dead.read().await.len(), 1);
    }

    #[tokio::test]
    async fn dispatch_does_not_block_on_slow_workers() {
        let (dispatcher, pool) = spawn_pool(
            DispatchConfig {
                workers: 1,
                ..test_config()
            },
            Arc::new(HangingHandler),
        );

        // The single worker hangs on the first task; further dispatches
        // still return immediately.
        for i in 0..50 {
            dispatcher.dispatch("s1", &format!("turn {i}")).unwrap();
        }

        drop(dispatcher);
        drop(pool);
    }

    async fn pool_join_with_dead_letters(pool: WorkerPool, expected: usize) {
        let dead = pool.dead_letters.clone();
        pool.join().await;
        assert_eq!(dead.read().await.len(), expected);
    }
}
