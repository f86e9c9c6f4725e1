//! Service wiring shared by the binary and integration tests.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::config::SyncSettings;
use crate::domain::ports::SourceExport;
use crate::domain::{
    GroupReconciler, MemberReconciler, OfficerReconciler, OwnerSynchronizer, PersonReconciler,
    ReconcileService, Reconcilers, ReportService, StatusTransitionService, SyncPassService,
};
use crate::outbound::RosterStores;
use crate::outbound::queue::{QueueRuntime, TokioReconcileQueue};

/// Every service an operator command can reach, over one set of stores.
pub struct RosterApp {
    reconcilers: Reconcilers,
    sync: SyncPassService,
    transitions: StatusTransitionService,
    reports: ReportService,
    queue: Arc<TokioReconcileQueue>,
}

impl RosterApp {
    /// Build the reconcilers, spawn the worker pool and wire the services.
    ///
    /// Must be called inside a tokio runtime.
    pub fn assemble(
        stores: &RosterStores,
        source: Arc<dyn SourceExport>,
        settings: &SyncSettings,
        runtime: QueueRuntime,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let owners = OwnerSynchronizer::new(stores.accounts.clone(), stores.owners.clone());
        let reconcilers = Reconcilers {
            groups: GroupReconciler::new(
                stores.groups.clone(),
                stores.people.clone(),
                settings.senior_reference_date(),
            ),
            people: PersonReconciler::new(stores.people.clone(), owners.clone()),
            officers: OfficerReconciler::new(
                stores.people.clone(),
                stores.groups.clone(),
                stores.officers.clone(),
                owners.clone(),
            ),
            members: MemberReconciler::new(
                stores.people.clone(),
                stores.groups.clone(),
                stores.members.clone(),
                owners,
            ),
        };
        let command = Arc::new(ReconcileService::new(
            reconcilers.groups.clone(),
            reconcilers.people.clone(),
            reconcilers.officers.clone(),
            reconcilers.members.clone(),
        ));
        let queue = Arc::new(TokioReconcileQueue::spawn(
            command,
            settings.workers(),
            settings.retry_policy(),
            runtime,
        ));
        let sync = SyncPassService::new(source, queue.clone(), reconcilers.clone(), clock.clone());
        let transitions = StatusTransitionService::new(
            stores.groups.clone(),
            stores.people.clone(),
            stores.members.clone(),
            stores.officers.clone(),
            stores.state_log.clone(),
            clock,
        );
        let reports = ReportService::new(stores.groups.clone(), stores.people.clone());
        Self {
            reconcilers,
            sync,
            transitions,
            reports,
            queue,
        }
    }

    /// Sync pass orchestrator.
    pub fn sync(&self) -> &SyncPassService {
        &self.sync
    }

    /// Group reconciler, for tree sort and senior refresh.
    pub fn groups(&self) -> &GroupReconciler {
        &self.reconcilers.groups
    }

    /// Journalled status transitions.
    pub fn transitions(&self) -> &StatusTransitionService {
        &self.transitions
    }

    /// Report projections.
    pub fn reports(&self) -> &ReportService {
        &self.reports
    }

    /// Stop the worker pool once every service has been dropped.
    pub async fn shutdown(self) {
        let Self { sync, queue, .. } = self;
        drop(sync);
        match Arc::try_unwrap(queue) {
            Ok(queue) => queue.shutdown().await,
            Err(_) => warn!("reconcile queue still shared at shutdown; workers left running"),
        }
    }
}
