//! Port for the `owners` relations on groups and persons.

use async_trait::async_trait;
use uuid::Uuid;

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by owner repository adapters.
    pub enum OwnerRepositoryError => "owner repository"
}

/// Port for the owner relations. Recomputes read the roster and write the
/// owners atomically, so concurrent recomputes for one target serialize.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Set a group's owners to the accounts whose email matches one of its
    /// active officers. Returns the new owner ids in ascending order.
    async fn recompute_group_owners(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError>;

    /// Set a person's owners to the accounts sharing their non-empty email.
    /// Returns the new owner ids in ascending order.
    async fn recompute_person_owners(
        &self,
        person_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError>;

    /// Current owners of a group.
    async fn group_owners(&self, group_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError>;

    /// Current owners of a person.
    async fn person_owners(&self, person_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError>;
}
