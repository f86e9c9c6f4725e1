//! Port for canonical group persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, GroupStatus, GroupUpsert, TreeNode, Upserted};

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by group repository adapters.
    pub enum GroupRepositoryError => "group repository"
}

/// Port for reading and writing groups.
///
/// Upserts are keyed on the group id and only overwrite the fields carried
/// by [`GroupUpsert`]; curated fields and `tree_sort` are preserved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, GroupRepositoryError>;

    /// Insert or update a group keyed on its id.
    async fn upsert(&self, group: GroupUpsert) -> Result<Upserted<Group>, GroupRepositoryError>;

    /// Delete every group whose id is not in `live_ids`. Returns the count.
    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, GroupRepositoryError>;

    /// Every group projected to the fields the tree sort reads.
    async fn list_tree_nodes(&self) -> Result<Vec<TreeNode>, GroupRepositoryError>;

    /// Clear every `tree_sort` and write the given assignments atomically.
    async fn replace_tree_sort(
        &self,
        assignments: &[(Uuid, i32)],
    ) -> Result<(), GroupRepositoryError>;

    /// Active quartets ordered by name.
    async fn list_active_quartets(&self) -> Result<Vec<Group>, GroupRepositoryError>;

    /// Persist the senior designation of one group.
    async fn set_is_senior(&self, id: Uuid, is_senior: bool) -> Result<(), GroupRepositoryError>;

    /// Persist a new lifecycle status.
    async fn set_status(&self, id: Uuid, status: GroupStatus) -> Result<(), GroupRepositoryError>;
}
