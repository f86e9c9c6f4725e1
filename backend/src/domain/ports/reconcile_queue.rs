//! Outbound task contract: one reconciliation job per source record.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, HumanRecord, JoinRecord, RoleRecord, StructureRecord};

use super::define_port_error;

/// One unit of reconciliation work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum ReconcileJob {
    /// Upsert a group from a structure.
    Structure(StructureRecord),
    /// Upsert a person from a human.
    Human(HumanRecord),
    /// Upsert an officer from a role.
    Role(RoleRecord),
    /// Upsert a member from a join.
    Join(JoinRecord),
}

impl fmt::Display for ReconcileJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(record) => write!(f, "structure {}", record.id),
            Self::Human(record) => write!(f, "human {}", record.id),
            Self::Role(record) => write!(
                f,
                "role {} of human {} in structure {}",
                record.name, record.human_id, record.structure_id
            ),
            Self::Join(record) => write!(
                f,
                "join of human {} in structure {}",
                record.human_id, record.structure_id
            ),
        }
    }
}

/// A job that exhausted its attempts or failed permanently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    /// Human-readable job description.
    pub job: String,
    /// Attempts made.
    pub attempts: u32,
    /// Final error message.
    pub message: String,
}

/// Outcome of waiting for the queue to go idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs that succeeded since the previous drain.
    pub completed: usize,
    /// Jobs that failed permanently since the previous drain.
    pub failures: Vec<JobFailure>,
}

impl DrainReport {
    /// Fold another report into this one.
    pub fn absorb(&mut self, other: DrainReport) {
        self.completed += other.completed;
        self.failures.extend(other.failures);
    }
}

define_port_error! {
    /// Errors raised by queue adapters.
    pub enum ReconcileQueueError {
        /// The queue no longer accepts jobs.
        Closed { message: String } => "reconcile queue closed: {message}",
    }
}

impl From<ReconcileQueueError> for Error {
    fn from(error: ReconcileQueueError) -> Self {
        Error::service_unavailable(error.to_string())
    }
}

/// At-least-once executor for reconciliation jobs.
///
/// Jobs run concurrently with no ordering guarantee. [`ReconcileQueue::drain`]
/// is the only barrier: it resolves once every job enqueued before the call
/// has finished, successfully or not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReconcileQueue: Send + Sync {
    /// Submit one job.
    async fn enqueue(&self, job: ReconcileJob) -> Result<(), ReconcileQueueError>;

    /// Wait until the queue is idle and report what ran since the last drain.
    async fn drain(&self) -> Result<DrainReport, ReconcileQueueError>;
}
