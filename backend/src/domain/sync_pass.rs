//! One reconciliation pass over the legacy export.
//!
//! Persons and groups must be quiescent before officers and members are
//! enqueued, because those resolve their person and group by id. Parents
//! are reconciled a tier ahead of their children for the same reason.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::member_reconciler::member_key;
use crate::domain::officer_reconciler::{merge_roles_by_office, officer_key};
use crate::domain::ports::{DrainReport, JobFailure, ReconcileJob, ReconcileQueue, SourceExport};
use crate::domain::{
    Error, GroupReconciler, MemberReconciler, OfficerReconciler, PersonReconciler,
    StructureRecord, SyncWindow,
};

/// Summary of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Whether the pass was a full export.
    pub full: bool,
    /// Humans fetched.
    pub humans: usize,
    /// Structures fetched.
    pub structures: usize,
    /// Officer jobs after merging roles that share an office.
    pub roles: usize,
    /// Joins fetched.
    pub joins: usize,
    /// Jobs that succeeded.
    pub completed: usize,
    /// Jobs that failed permanently.
    #[serde(skip)]
    pub failures: Vec<JobFailure>,
    /// Persons deleted as orphans.
    pub deleted_persons: usize,
    /// Groups deleted as orphans.
    pub deleted_groups: usize,
    /// Officers deleted as orphans.
    pub deleted_officers: usize,
    /// Members deleted as orphans.
    pub deleted_members: usize,
    /// Groups numbered by the tree sort.
    pub sorted_groups: usize,
}

impl SyncReport {
    fn absorb(&mut self, drained: DrainReport) {
        self.completed += drained.completed;
        self.failures.extend(drained.failures);
    }
}

/// The reconcilers a pass drives directly for orphan and sort work.
#[derive(Clone)]
pub struct Reconcilers {
    /// Group reconciler.
    pub groups: GroupReconciler,
    /// Person reconciler.
    pub people: PersonReconciler,
    /// Officer reconciler.
    pub officers: OfficerReconciler,
    /// Member reconciler.
    pub members: MemberReconciler,
}

/// Orchestrates fetch, enqueue, barriers and orphan deletion.
#[derive(Clone)]
pub struct SyncPassService {
    source: Arc<dyn SourceExport>,
    queue: Arc<dyn ReconcileQueue>,
    reconcilers: Reconcilers,
    clock: Arc<dyn Clock>,
}

impl SyncPassService {
    /// Create the orchestrator.
    pub fn new(
        source: Arc<dyn SourceExport>,
        queue: Arc<dyn ReconcileQueue>,
        reconcilers: Reconcilers,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            queue,
            reconcilers,
            clock,
        }
    }

    /// Run a pass over the given window. Orphans are deleted only for a
    /// full window.
    pub async fn run(&self, window: SyncWindow) -> Result<SyncReport, Error> {
        let cursor = window.cursor(self.clock.utc());
        let mut report = SyncReport {
            full: window.is_full(),
            ..SyncReport::default()
        };

        self.source.refresh().await?;
        let humans = self.source.export_humans(cursor).await?;
        report.humans = humans.len();
        let live_persons: Vec<_> = humans.iter().map(|record| record.id).collect();
        for record in humans {
            self.queue.enqueue(ReconcileJob::Human(record)).await?;
        }

        let structures = self.source.export_structures(cursor).await?;
        report.structures = structures.len();
        let live_groups: Vec<_> = structures.iter().map(|record| record.id).collect();
        for tier in structures.chunk_by(|a, b| a.kind == b.kind) {
            self.enqueue_tier(tier).await?;
            report.absorb(self.queue.drain().await?);
        }
        report.absorb(self.queue.drain().await?);

        if report.full {
            let reconcilers = &self.reconcilers;
            report.deleted_persons = reconcilers.people.delete_orphans(&live_persons).await?;
            report.deleted_groups = reconcilers.groups.delete_orphans(&live_groups).await?;
        }
        report.sorted_groups = self.reconcilers.groups.sort_tree().await?;

        let roles = merge_roles_by_office(self.source.export_roles(cursor).await?);
        let joins = self.source.export_joins(cursor).await?;
        report.roles = roles.len();
        report.joins = joins.len();
        let live_officers: Vec<_> = roles.iter().map(officer_key).collect();
        let live_members: Vec<_> = joins.iter().map(member_key).collect();
        for record in roles {
            self.queue.enqueue(ReconcileJob::Role(record)).await?;
        }
        for record in joins {
            self.queue.enqueue(ReconcileJob::Join(record)).await?;
        }
        report.absorb(self.queue.drain().await?);

        if report.full {
            report.deleted_officers = self
                .reconcilers
                .officers
                .delete_orphans(&live_officers)
                .await?;
            report.deleted_members = self
                .reconcilers
                .members
                .delete_orphans(&live_members)
                .await?;
        }

        if !report.failures.is_empty() {
            warn!(failed = report.failures.len(), "sync pass finished with failed jobs");
        }
        info!(
            full = report.full,
            humans = report.humans,
            structures = report.structures,
            roles = report.roles,
            joins = report.joins,
            completed = report.completed,
            failed = report.failures.len(),
            "sync pass complete"
        );
        Ok(report)
    }

    async fn enqueue_tier(&self, tier: &[StructureRecord]) -> Result<(), Error> {
        for record in tier {
            self.queue
                .enqueue(ReconcileJob::Structure(record.clone()))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sync_pass_tests.rs"]
mod tests;
