//! Officer reconciliation from aggregated legacy roles.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{GroupRepository, OfficerRepository, PersonRepository};
use crate::domain::tokens::office_token;
use crate::domain::{
    Error, Group, Office, Officer, OfficerKey, OfficerUpsert, OwnerSynchronizer, Person,
    RoleRecord, Status, Upserted,
};

/// Office for a legacy role name. Unrecognised roles are managers.
pub fn office_for_role(name: &str) -> Office {
    office_token(Some(name))
        .logged("office")
        .unwrap_or(Office::Manager)
}

/// Natural key of the officer a role record reconciles into.
pub fn officer_key(record: &RoleRecord) -> OfficerKey {
    OfficerKey {
        person_id: record.human_id,
        group_id: record.structure_id,
        office: office_for_role(&record.name),
    }
}

/// Collapse role records that reconcile into the same officer.
///
/// Several legacy role names map to one office, so their aggregates would
/// otherwise race on one natural key. The merged record keeps the earliest
/// start, an open end if any record is open and the latest end otherwise,
/// and is active when any record is active. Output is ordered by key.
pub fn merge_roles_by_office(records: Vec<RoleRecord>) -> Vec<RoleRecord> {
    let mut merged: BTreeMap<OfficerKey, RoleRecord> = BTreeMap::new();
    for record in records {
        match merged.entry(officer_key(&record)) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => absorb_role(slot.get_mut(), record),
        }
    }
    merged.into_values().collect()
}

fn absorb_role(kept: &mut RoleRecord, other: RoleRecord) {
    if other.name < kept.name {
        kept.name = other.name;
    }
    kept.start_date = match (kept.start_date, other.start_date) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    kept.end_date = match (kept.end_date, other.end_date) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    };
    if other.status == Status::Active {
        kept.status = Status::Active;
    }
}

/// Reconciles roles into officers and recomputes group owners.
#[derive(Clone)]
pub struct OfficerReconciler {
    people: Arc<dyn PersonRepository>,
    groups: Arc<dyn GroupRepository>,
    officers: Arc<dyn OfficerRepository>,
    owners: OwnerSynchronizer,
}

impl OfficerReconciler {
    /// Create a reconciler.
    pub fn new(
        people: Arc<dyn PersonRepository>,
        groups: Arc<dyn GroupRepository>,
        officers: Arc<dyn OfficerRepository>,
        owners: OwnerSynchronizer,
    ) -> Self {
        Self {
            people,
            groups,
            officers,
            owners,
        }
    }

    /// Upsert the officer matching a role record.
    ///
    /// Fails with `NotFound` when the person or group has not been
    /// reconciled yet, so the job can be retried after they land.
    pub async fn upsert_officer(&self, record: &RoleRecord) -> Result<Upserted<Officer>, Error> {
        let person = resolve_person(self.people.as_ref(), record.human_id).await?;
        let group = resolve_group(self.groups.as_ref(), record.structure_id).await?;

        let upsert = OfficerUpsert {
            key: OfficerKey {
                person_id: person.id,
                group_id: group.id,
                office: office_for_role(&record.name),
            },
            status: record.status,
            start_date: record.start_date,
            end_date: record.end_date,
        };
        let result = self.officers.upsert(upsert).await?;
        self.owners.ensure_account(&person).await?;
        self.owners.sync_group_owners(group.id).await?;
        debug!(
            officer_id = %result.value.id,
            office = %result.value.key.office,
            created = result.created,
            "officer reconciled"
        );
        Ok(result)
    }

    /// Delete officers whose natural key is absent from a full role export.
    pub async fn delete_orphans(&self, live_keys: &[OfficerKey]) -> Result<usize, Error> {
        let deleted = self.officers.delete_orphans(live_keys).await?;
        info!(deleted, "officer orphans deleted");
        Ok(deleted)
    }
}

pub(crate) async fn resolve_person(
    people: &dyn PersonRepository,
    id: Uuid,
) -> Result<Person, Error> {
    people
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("person {id} has not been reconciled")))
}

pub(crate) async fn resolve_group(
    groups: &dyn GroupRepository,
    id: Uuid,
) -> Result<Group, Error> {
    groups
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("group {id} has not been reconciled")))
}

#[cfg(test)]
#[path = "officer_reconciler_tests.rs"]
mod tests;
