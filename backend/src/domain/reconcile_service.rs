//! Dispatches queued jobs to the matching reconciler.

use async_trait::async_trait;

use crate::domain::ports::{ReconcileCommand, ReconcileJob, ReconcileOutcome};
use crate::domain::{
    EntityKind, Error, GroupReconciler, MemberReconciler, OfficerReconciler, PersonReconciler,
};

/// The four reconcilers behind a single command seam.
#[derive(Clone)]
pub struct ReconcileService {
    groups: GroupReconciler,
    people: PersonReconciler,
    officers: OfficerReconciler,
    members: MemberReconciler,
}

impl ReconcileService {
    /// Bundle the reconcilers.
    pub fn new(
        groups: GroupReconciler,
        people: PersonReconciler,
        officers: OfficerReconciler,
        members: MemberReconciler,
    ) -> Self {
        Self {
            groups,
            people,
            officers,
            members,
        }
    }
}

#[async_trait]
impl ReconcileCommand for ReconcileService {
    async fn reconcile(&self, job: &ReconcileJob) -> Result<ReconcileOutcome, Error> {
        let outcome = match job {
            ReconcileJob::Structure(record) => {
                let result = self.groups.upsert_group(record).await?;
                ReconcileOutcome {
                    entity: EntityKind::Group,
                    id: result.value.id,
                    created: result.created,
                }
            }
            ReconcileJob::Human(record) => {
                let result = self.people.upsert_person(record).await?;
                ReconcileOutcome {
                    entity: EntityKind::Person,
                    id: result.value.id,
                    created: result.created,
                }
            }
            ReconcileJob::Role(record) => {
                let result = self.officers.upsert_officer(record).await?;
                ReconcileOutcome {
                    entity: EntityKind::Officer,
                    id: result.value.id,
                    created: result.created,
                }
            }
            ReconcileJob::Join(record) => {
                let result = self.members.upsert_member(record).await?;
                ReconcileOutcome {
                    entity: EntityKind::Member,
                    id: result.value.id,
                    created: result.created,
                }
            }
        };
        Ok(outcome)
    }
}
