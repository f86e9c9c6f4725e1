//! Tokio worker-pool adapter for the reconcile queue.
//!
//! Jobs fan out to `workers` tasks sharing one channel. Retryable failures
//! back off exponentially with jitter until `max_attempts`; anything else
//! is logged and reported by the next [`ReconcileQueue::drain`]. A failed
//! job never blocks the others. Each job runs in its own task, so a panic
//! inside a reconciler is reported as a permanent failure and leaves the
//! worker and the drain count intact.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex as AsyncMutex, Notify, mpsc};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, warn};

use crate::domain::ports::{
    DrainReport, JobFailure, ReconcileCommand, ReconcileJob, ReconcileQueue, ReconcileQueueError,
};

/// Attempt limit and base delay for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Un-jittered delay after the given failed attempt (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use roster_backend::outbound::queue::RetryPolicy;
    ///
    /// let policy = RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(250) };
    /// assert_eq!(policy.backoff(1), Duration::from_millis(250));
    /// assert_eq!(policy.backoff(3), Duration::from_millis(1000));
    /// ```
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// Async sleep used between attempts.
#[async_trait]
pub trait QueueSleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Randomises a backoff delay.
pub trait BackoffJitter: Send + Sync {
    /// Delay to wait given the exponential base.
    fn jittered_delay(&self, base: Duration, attempt: u32) -> Duration;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl QueueSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds up to a quarter of the base delay at random.
#[derive(Debug)]
pub struct RandomJitter {
    rng: Mutex<SmallRng>,
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }
}

impl BackoffJitter for RandomJitter {
    fn jittered_delay(&self, base: Duration, _attempt: u32) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let max_extra = base_ms / 4;
        let extra = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..=max_extra);
        Duration::from_millis(base_ms.saturating_add(extra))
    }
}

/// Sleep and jitter seams for the workers.
pub struct QueueRuntime {
    /// Sleeper.
    pub sleeper: Arc<dyn QueueSleeper>,
    /// Jitter strategy.
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for QueueRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter::default()),
        }
    }
}

struct Shared {
    command: Arc<dyn ReconcileCommand>,
    policy: RetryPolicy,
    runtime: QueueRuntime,
    in_flight: AtomicUsize,
    idle: Notify,
    report: Mutex<DrainReport>,
}

impl Shared {
    fn report(&self) -> MutexGuard<'_, DrainReport> {
        self.report.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, job: ReconcileJob, attempts: &AtomicU32) {
        let mut attempt = 1;
        loop {
            attempts.store(attempt, Ordering::Release);
            match self.command.reconcile(&job).await {
                Ok(outcome) => {
                    debug!(
                        %job,
                        entity = %outcome.entity,
                        id = %outcome.id,
                        created = outcome.created,
                        attempt,
                        "reconcile job complete"
                    );
                    self.report().completed += 1;
                    return;
                }
                Err(err) if err.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self
                        .runtime
                        .jitter
                        .jittered_delay(self.policy.backoff(attempt), attempt);
                    warn!(
                        %job,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "reconcile job failed; retrying"
                    );
                    self.runtime.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(%job, attempts = attempt, error = %err, "reconcile job failed permanently");
                    self.report().failures.push(JobFailure {
                        job: job.to_string(),
                        attempts: attempt,
                        message: err.to_string(),
                    });
                    return;
                }
            }
        }
    }

    fn record_panic(&self, job: String, attempts: u32, err: &JoinError) {
        error!(%job, attempts, error = %err, "reconcile job panicked");
        self.report().failures.push(JobFailure {
            job,
            attempts,
            message: format!("reconciler panicked: {err}"),
        });
    }

    fn finish_one(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// In-process [`ReconcileQueue`] backed by tokio tasks.
pub struct TokioReconcileQueue {
    sender: mpsc::UnboundedSender<ReconcileJob>,
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TokioReconcileQueue {
    /// Spawn `workers` tasks (at least one) that run jobs through `command`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(
        command: Arc<dyn ReconcileCommand>,
        workers: usize,
        policy: RetryPolicy,
        runtime: QueueRuntime,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(AsyncMutex::new(receiver));
        let shared = Arc::new(Shared {
            command,
            policy,
            runtime,
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
            report: Mutex::new(DrainReport::default()),
        });
        let workers = (0..workers.max(1))
            .map(|_| tokio::spawn(work(Arc::clone(&shared), Arc::clone(&receiver))))
            .collect();
        Self {
            sender,
            shared,
            workers,
        }
    }

    /// Stop accepting jobs and wait for the workers to finish.
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            if let Err(err) = worker.await {
                warn!(error = %err, "reconcile worker ended abnormally");
            }
        }
    }
}

async fn work(shared: Arc<Shared>, receiver: Arc<AsyncMutex<mpsc::UnboundedReceiver<ReconcileJob>>>) {
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };
        let label = job.to_string();
        let attempts = Arc::new(AtomicU32::new(0));
        let task = {
            let shared = Arc::clone(&shared);
            let attempts = Arc::clone(&attempts);
            tokio::spawn(async move { shared.run(job, &attempts).await })
        };
        if let Err(err) = task.await {
            shared.record_panic(label, attempts.load(Ordering::Acquire), &err);
        }
        shared.finish_one();
    }
}

#[async_trait]
impl ReconcileQueue for TokioReconcileQueue {
    async fn enqueue(&self, job: ReconcileJob) -> Result<(), ReconcileQueueError> {
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
        self.sender.send(job).map_err(|_| {
            self.shared.finish_one();
            ReconcileQueueError::closed("workers have stopped")
        })
    }

    async fn drain(&self) -> Result<DrainReport, ReconcileQueueError> {
        loop {
            let notified = self.shared.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.shared.in_flight.load(Ordering::Acquire) == 0 {
                break;
            }
            notified.await;
        }
        Ok(std::mem::take(&mut *self.shared.report()))
    }
}
