//! Bounded fan-out batch processing
//!
//! Runs a fallible per-item operation over a finite batch with a fixed
//! number of concurrent workers and hands back exactly one outcome per
//! item. The engine never interprets per-item errors; the caller picks
//! an aggregation policy ([`split_failures`] or [`require_all`]).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, warn};

/// Default number of concurrent workers per batch
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Number of concurrent workers spawned per batch
    pub workers: usize,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKER_COUNT,
        }
    }
}

impl FanoutConfig {
    /// Create a configuration with the default worker count
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count (clamped to at least one worker)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// An item as submitted into the job channel. Ownership moves to exactly
/// one worker.
#[derive(Debug)]
struct Job<I> {
    index: usize,
    item: I,
}

/// The outcome of one item, tagged with the item's position in the
/// submitted batch. Identity rides here, never in arrival order.
#[derive(Debug)]
pub struct ItemOutcome<T, E> {
    /// Index of the item in the submitted batch
    pub index: usize,
    /// Success value or per-item error
    pub outcome: Result<T, E>,
}

/// A single item's failure, tagged with its batch index
#[derive(Debug)]
pub struct ItemFailure<E> {
    /// Index of the failed item in the submitted batch
    pub index: usize,
    /// The per-item error
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for ItemFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} failed: {}", self.index, self.error)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ItemFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of draining a batch
#[derive(Debug)]
pub enum BatchOutcome<T, E> {
    /// Every submitted item produced exactly one outcome
    Completed(Vec<ItemOutcome<T, E>>),
    /// The batch was canceled; only `completed.len()` of `total` items
    /// produced an outcome before the workers stopped
    Canceled {
        completed: Vec<ItemOutcome<T, E>>,
        total: usize,
    },
}

impl<T, E> BatchOutcome<T, E> {
    /// Whether every submitted item produced an outcome
    pub fn is_complete(&self) -> bool {
        matches!(self, BatchOutcome::Completed(_))
    }

    /// The outcomes gathered so far, complete or not
    pub fn into_outcomes(self) -> Vec<ItemOutcome<T, E>> {
        match self {
            BatchOutcome::Completed(outcomes) => outcomes,
            BatchOutcome::Canceled { completed, .. } => completed,
        }
    }
}

/// Run `process` over every item in the batch with `config.workers`
/// concurrent workers.
///
/// Both channels are buffered to the batch length, so submitting all
/// items can never block even while every worker is busy. The job
/// channel is closed once the last item is submitted; that close is the
/// only termination signal the workers receive. Returns once all
/// outcomes are drained and every worker task has exited.
pub async fn run_batch<I, T, E, F, Fut>(
    config: &FanoutConfig,
    items: Vec<I>,
    process: F,
) -> BatchOutcome<T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    // Keep the sender alive for the duration of the run so the workers
    // never mistake a dropped cancel handle for a cancellation.
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    run_batch_with_cancel(config, items, cancel_rx, process).await
}

/// Same as [`run_batch`], but stops early when `cancel` flips to `true`:
/// submission halts, each worker finishes its in-flight item and exits,
/// and the call reports how many of the submitted items produced an
/// outcome.
pub async fn run_batch_with_cancel<I, T, E, F, Fut>(
    config: &FanoutConfig,
    items: Vec<I>,
    cancel: watch::Receiver<bool>,
    process: F,
) -> BatchOutcome<T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return BatchOutcome::Completed(Vec::new());
    }

    debug!(total, workers = config.workers, "fanning out batch");

    // Capacity matches the batch, so neither submission nor result
    // emission can deadlock. This pre-sizing grows with the batch; it is
    // a known scaling limit, not a hidden bound.
    let (job_tx, job_rx) = mpsc::channel::<Job<I>>(total);
    let (result_tx, mut result_rx) = mpsc::channel::<ItemOutcome<T, E>>(total);

    // tokio's mpsc receiver is single-consumer; the mutex hands one job
    // to whichever worker holds the lock when it arrives.
    let job_rx = Arc::new(Mutex::new(job_rx));

    let mut workers = Vec::with_capacity(config.workers);
    for _ in 0..config.workers {
        workers.push(tokio::spawn(worker_loop(
            Arc::clone(&job_rx),
            result_tx.clone(),
            cancel.clone(),
            process.clone(),
        )));
    }
    drop(result_tx);

    for (index, item) in items.into_iter().enumerate() {
        if *cancel.borrow() {
            debug!(submitted = index, total, "cancellation observed, submission stopped");
            break;
        }
        if job_tx.send(Job { index, item }).await.is_err() {
            break;
        }
    }
    // Closing the job source is the workers' termination signal.
    drop(job_tx);

    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = result_rx.recv().await {
        outcomes.push(outcome);
    }

    // Every worker has dropped its result sender by now; join them so no
    // task outlives the batch.
    join_all(workers).await;

    if outcomes.len() == total {
        BatchOutcome::Completed(outcomes)
    } else {
        warn!(
            completed = outcomes.len(),
            total, "batch canceled before all items were processed"
        );
        BatchOutcome::Canceled {
            completed: outcomes,
            total,
        }
    }
}

async fn worker_loop<I, T, E, F, Fut>(
    jobs: Arc<Mutex<mpsc::Receiver<Job<I>>>>,
    results: mpsc::Sender<ItemOutcome<T, E>>,
    mut cancel: watch::Receiver<bool>,
    process: F,
) where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        if *cancel.borrow() {
            break;
        }
        let job = {
            let mut rx = jobs.lock().await;
            tokio::select! {
                job = rx.recv() => job,
                _ = cancel_signaled(&mut cancel) => None,
            }
        };
        let Some(job) = job else { break };

        let outcome = process(job.item).await;
        if results
            .send(ItemOutcome {
                index: job.index,
                outcome,
            })
            .await
            .is_err()
        {
            break;
        }
    }
}

/// Resolves only once cancellation is actually signaled. A dropped
/// sender means cancellation can no longer arrive, so park forever
/// instead of treating it as a cancel.
async fn cancel_signaled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|&stop| stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Tolerate policy: successes survive, failures are handed back so the
/// caller can log or count them.
pub fn split_failures<T, E>(outcomes: Vec<ItemOutcome<T, E>>) -> (Vec<T>, Vec<ItemFailure<E>>) {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for ItemOutcome { index, outcome } in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => failures.push(ItemFailure { index, error }),
        }
    }
    (values, failures)
}

/// Abort policy: the first failure in drain order poisons the whole
/// batch and partial successes are discarded.
pub fn require_all<T, E>(outcomes: Vec<ItemOutcome<T, E>>) -> Result<Vec<T>, ItemFailure<E>> {
    let mut values = Vec::with_capacity(outcomes.len());
    for ItemOutcome { index, outcome } in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => return Err(ItemFailure { index, error }),
        }
    }
    Ok(values)
}
