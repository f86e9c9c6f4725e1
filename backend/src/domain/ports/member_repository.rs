//! Port for roster membership persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Member, MemberKey, MemberUpsert, Status, Upserted};

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by member repository adapters.
    pub enum MemberRepositoryError => "member repository"
}

/// Port for reading and writing members keyed on `(group, person)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Fetch a member by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, MemberRepositoryError>;

    /// Insert or update a member keyed on `(group, person)`.
    async fn upsert(&self, member: MemberUpsert)
    -> Result<Upserted<Member>, MemberRepositoryError>;

    /// Delete every member whose natural key is not in `live_keys`.
    async fn delete_orphans(&self, live_keys: &[MemberKey])
    -> Result<usize, MemberRepositoryError>;

    /// Persist a new lifecycle status.
    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), MemberRepositoryError>;
}
