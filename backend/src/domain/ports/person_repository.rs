//! Port for canonical person persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Person, PersonUpsert, Status, Upserted};

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by person repository adapters.
    pub enum PersonRepositoryError => "person repository"
}

/// Port for reading and writing persons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Fetch a person by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, PersonRepositoryError>;

    /// Insert or update a person keyed on its id.
    ///
    /// `initial_status` and `initial_current_through` are written on insert
    /// only.
    async fn upsert(&self, person: PersonUpsert)
    -> Result<Upserted<Person>, PersonRepositoryError>;

    /// Record the national membership signal on a person.
    async fn record_membership(
        &self,
        id: Uuid,
        status: Status,
        current_through: Option<NaiveDate>,
    ) -> Result<Option<Person>, PersonRepositoryError>;

    /// Delete every person whose id is not in `live_ids`. Returns the count.
    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, PersonRepositoryError>;

    /// Persons holding an active member row in the group.
    async fn list_active_members_of(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Person>, PersonRepositoryError>;

    /// Persist a new lifecycle status.
    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), PersonRepositoryError>;
}
