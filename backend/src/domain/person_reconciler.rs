//! Person reconciliation from legacy humans.

use std::sync::Arc;

use normalization::{RawName, decompose_name, validate_email, validate_phone};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::PersonRepository;
use crate::domain::tokens::{person_gender_token, voice_part_token};
use crate::domain::{
    Error, HumanRecord, OwnerSynchronizer, Person, PersonUpsert, Status, Upserted,
};

fn phone(value: Option<&String>) -> String {
    validate_phone(value.map_or("", String::as_str))
}

/// Build the person write payload for a human record.
///
/// Status and `current_through` only seed new rows; afterwards they belong
/// to root-group membership reconciliation.
pub fn person_upsert(record: &HumanRecord) -> PersonUpsert {
    let name = decompose_name(RawName {
        first: record.first_name.as_deref(),
        middle: record.middle_name.as_deref(),
        last: record.last_name.as_deref(),
        nick: record.nick_name.as_deref(),
    });
    PersonUpsert {
        id: record.id,
        prefix: name.prefix,
        first_name: name.first,
        middle_name: name.middle,
        last_name: name.last,
        nick_name: name.nick,
        suffix: name.suffix,
        email: validate_email(record.email.as_deref().unwrap_or_default()),
        birth_date: record.birth_date,
        home_phone: phone(record.home_phone.as_ref()),
        cell_phone: phone(record.cell_phone.as_ref()),
        work_phone: phone(record.work_phone.as_ref()),
        bhs_id: record.bhs_id,
        gender: person_gender_token(record.gender.as_deref()).logged("gender"),
        part: voice_part_token(record.part.as_deref()).logged("part"),
        mon: record.mon,
        is_deceased: record.is_deceased.unwrap_or(false),
        is_honorary: record.is_honorary.unwrap_or(false),
        is_suspended: record.is_suspended.unwrap_or(false),
        is_expelled: record.is_expelled.unwrap_or(false),
        initial_status: record.status.unwrap_or(Status::New),
        initial_current_through: record.current_through,
    }
}

/// Reconciles humans into persons and keeps their accounts in step.
#[derive(Clone)]
pub struct PersonReconciler {
    people: Arc<dyn PersonRepository>,
    owners: OwnerSynchronizer,
}

impl PersonReconciler {
    /// Create a reconciler.
    pub fn new(people: Arc<dyn PersonRepository>, owners: OwnerSynchronizer) -> Self {
        Self { people, owners }
    }

    /// Upsert the person matching a human record, then refresh the linked
    /// account and the person's owners.
    pub async fn upsert_person(&self, record: &HumanRecord) -> Result<Upserted<Person>, Error> {
        if record.id.is_nil() {
            return Err(Error::invalid_request("human record has a nil id"));
        }
        let result = self.people.upsert(person_upsert(record)).await?;
        self.owners.ensure_account(&result.value).await?;
        self.owners.sync_person_owners(&result.value).await?;
        debug!(person_id = %result.value.id, created = result.created, "person reconciled");
        Ok(result)
    }

    /// Delete persons absent from a full human export.
    pub async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, Error> {
        let deleted = self.people.delete_orphans(live_ids).await?;
        info!(deleted, "person orphans deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "person_reconciler_tests.rs"]
mod tests;
