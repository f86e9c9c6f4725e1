//! PostgreSQL-backed `GroupRepository`.
//!
//! Upserts lock and read the existing row inside one transaction so curated
//! columns and `tree_sort` survive a reconcile untouched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{Group, GroupKind, GroupStatus, GroupUpsert, TreeNode, Upserted};

use super::error_mapping::map_diesel_error;
use super::models::{GroupRow, TreeNodeRow};
use super::pool::DbPool;
use super::schema::groups;

/// Diesel implementation of [`GroupRepository`].
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<GroupRow> = groups::table
            .find(id)
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(Group::try_from).transpose()
    }

    async fn upsert(&self, upsert: GroupUpsert) -> Result<Upserted<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, GroupRepositoryError, _>(|conn| {
            async move {
                let existing: Option<GroupRow> = groups::table
                    .find(upsert.id)
                    .select(GroupRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let created = existing.is_none();
                let group = match existing {
                    Some(row) => {
                        let mut group = Group::try_from(row)?;
                        group.apply_upsert(upsert);
                        group
                    }
                    None => Group::from_upsert(upsert),
                };

                let row = GroupRow::from(&group);
                diesel::insert_into(groups::table)
                    .values(&row)
                    .on_conflict(groups::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .await?;
                Ok(Upserted {
                    value: group,
                    created,
                })
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::delete(groups::table.filter(groups::id.ne_all(live_ids)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_tree_nodes(&self) -> Result<Vec<TreeNode>, GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<TreeNodeRow> = groups::table
            .select(TreeNodeRow::as_select())
            .load(&mut conn)
            .await?;
        rows.into_iter().map(TreeNode::try_from).collect()
    }

    async fn replace_tree_sort(
        &self,
        assignments: &[(Uuid, i32)],
    ) -> Result<(), GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        let assignments = assignments.to_vec();
        conn.transaction::<_, GroupRepositoryError, _>(|conn| {
            async move {
                // Cleared first: tree_sort is unique.
                diesel::update(groups::table)
                    .set(groups::tree_sort.eq(None::<i32>))
                    .execute(conn)
                    .await?;
                for (id, position) in assignments {
                    diesel::update(groups::table.find(id))
                        .set(groups::tree_sort.eq(Some(position)))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn list_active_quartets(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<GroupRow> = groups::table
            .filter(groups::kind.eq(GroupKind::Quartet.code()))
            .filter(groups::status.eq(GroupStatus::Active.code()))
            .order_by(groups::name)
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await?;
        rows.into_iter().map(Group::try_from).collect()
    }

    async fn set_is_senior(&self, id: Uuid, is_senior: bool) -> Result<(), GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::update(groups::table.find(id))
            .set(groups::is_senior.eq(is_senior))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_status(&self, id: Uuid, status: GroupStatus) -> Result<(), GroupRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::update(groups::table.find(id))
            .set(groups::status.eq(status.code()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
