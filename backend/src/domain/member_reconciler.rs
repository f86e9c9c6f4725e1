//! Member reconciliation from aggregated legacy joins.
//!
//! Membership of the root organisation is the authoritative national
//! membership signal: it is copied onto the person's status and
//! `current_through`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::officer_reconciler::{resolve_group, resolve_person};
use crate::domain::ports::{GroupRepository, MemberRepository, PersonRepository};
use crate::domain::tokens::voice_part_token;
use crate::domain::{
    Error, JoinRecord, Member, MemberKey, MemberUpsert, OwnerSynchronizer, Upserted,
};

/// Natural key of the member a join record reconciles into.
pub fn member_key(record: &JoinRecord) -> MemberKey {
    MemberKey {
        group_id: record.structure_id,
        person_id: record.human_id,
    }
}

/// Reconciles joins into members.
#[derive(Clone)]
pub struct MemberReconciler {
    people: Arc<dyn PersonRepository>,
    groups: Arc<dyn GroupRepository>,
    members: Arc<dyn MemberRepository>,
    owners: OwnerSynchronizer,
}

impl MemberReconciler {
    /// Create a reconciler.
    pub fn new(
        people: Arc<dyn PersonRepository>,
        groups: Arc<dyn GroupRepository>,
        members: Arc<dyn MemberRepository>,
        owners: OwnerSynchronizer,
    ) -> Self {
        Self {
            people,
            groups,
            members,
            owners,
        }
    }

    /// Upsert the member matching a join record.
    ///
    /// Fails with `NotFound` when the person or group has not been
    /// reconciled yet.
    pub async fn upsert_member(&self, record: &JoinRecord) -> Result<Upserted<Member>, Error> {
        let person = resolve_person(self.people.as_ref(), record.human_id).await?;
        let group = resolve_group(self.groups.as_ref(), record.structure_id).await?;

        let upsert = MemberUpsert {
            key: MemberKey {
                group_id: group.id,
                person_id: person.id,
            },
            status: record.status,
            part: voice_part_token(record.vocal_part.as_deref()).logged("vocal_part"),
            start_date: record.start_date,
            end_date: record.end_date,
        };
        let result = self.members.upsert(upsert).await?;

        if group.is_root_organisation() && record.status.is_active() && !person.email.is_empty() {
            let updated = self
                .people
                .record_membership(person.id, record.status, record.end_date)
                .await?
                .unwrap_or(person);
            self.owners.ensure_account(&updated).await?;
            self.owners.sync_person_owners(&updated).await?;
            debug!(
                person_id = %updated.id,
                current_through = ?updated.current_through,
                "national membership recorded"
            );
        }

        debug!(member_id = %result.value.id, created = result.created, "member reconciled");
        Ok(result)
    }

    /// Delete members whose natural key is absent from a full join export.
    pub async fn delete_orphans(&self, live_keys: &[MemberKey]) -> Result<usize, Error> {
        let deleted = self.members.delete_orphans(live_keys).await?;
        info!(deleted, "member orphans deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "member_reconciler_tests.rs"]
mod tests;
