//! Driving port executed by queue workers for each job.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{EntityKind, Error};

use super::ReconcileJob;

/// What a single reconciliation wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Entity family written.
    pub entity: EntityKind,
    /// Id of the written row.
    pub id: Uuid,
    /// `true` when the row was inserted.
    pub created: bool,
}

/// Reconcile one source record into canonical storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReconcileCommand: Send + Sync {
    /// Run the reconciler matching the job kind.
    async fn reconcile(&self, job: &ReconcileJob) -> Result<ReconcileOutcome, Error>;
}
