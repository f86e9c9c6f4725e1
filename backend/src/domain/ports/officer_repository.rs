//! Port for officer persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Officer, OfficerKey, OfficerUpsert, Status, Upserted};

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by officer repository adapters.
    pub enum OfficerRepositoryError => "officer repository"
}

/// Port for reading and writing officers keyed on `(person, group, office)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficerRepository: Send + Sync {
    /// Fetch an officer by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, OfficerRepositoryError>;

    /// Insert or update an officer keyed on `(person, group, office)`.
    async fn upsert(
        &self,
        officer: OfficerUpsert,
    ) -> Result<Upserted<Officer>, OfficerRepositoryError>;

    /// Delete every officer whose natural key is not in `live_keys`.
    async fn delete_orphans(
        &self,
        live_keys: &[OfficerKey],
    ) -> Result<usize, OfficerRepositoryError>;

    /// Persist a new lifecycle status.
    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), OfficerRepositoryError>;
}
