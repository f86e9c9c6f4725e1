//! PostgreSQL-backed `MemberRepository` keyed on `(group_id, person_id)`.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{MemberRepository, MemberRepositoryError};
use crate::domain::{Member, MemberKey, MemberUpsert, Status, Upserted};

use super::error_mapping::map_diesel_error;
use super::models::MemberRow;
use super::pool::DbPool;
use super::schema::members;

/// Diesel implementation of [`MemberRepository`].
#[derive(Clone)]
pub struct DieselMemberRepository {
    pool: DbPool,
}

impl DieselMemberRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for DieselMemberRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, MemberRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<MemberRow> = members::table
            .find(id)
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(Member::try_from).transpose()
    }

    async fn upsert(
        &self,
        upsert: MemberUpsert,
    ) -> Result<Upserted<Member>, MemberRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, MemberRepositoryError, _>(|conn| {
            async move {
                let existing: Option<Uuid> = members::table
                    .filter(members::group_id.eq(upsert.key.group_id))
                    .filter(members::person_id.eq(upsert.key.person_id))
                    .select(members::id)
                    .first(conn)
                    .await
                    .optional()?;
                let created = existing.is_none();
                let id = existing.unwrap_or_else(Uuid::new_v4);

                let row = MemberRow::from(&Member::from_upsert(id, upsert));
                let stored: MemberRow = diesel::insert_into(members::table)
                    .values(&row)
                    .on_conflict((members::group_id, members::person_id))
                    .do_update()
                    .set((
                        members::status.eq(excluded(members::status)),
                        members::part.eq(excluded(members::part)),
                        members::start_date.eq(excluded(members::start_date)),
                        members::end_date.eq(excluded(members::end_date)),
                    ))
                    .returning(MemberRow::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(Upserted {
                    value: Member::try_from(stored)?,
                    created,
                })
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_orphans(
        &self,
        live_keys: &[MemberKey],
    ) -> Result<usize, MemberRepositoryError> {
        let mut conn = self.pool.get().await?;
        let live: HashSet<&MemberKey> = live_keys.iter().collect();
        let existing: Vec<(Uuid, Uuid, Uuid)> = members::table
            .select((members::id, members::group_id, members::person_id))
            .load(&mut conn)
            .await?;
        let stale: Vec<Uuid> = existing
            .into_iter()
            .filter(|(_, group_id, person_id)| {
                !live.contains(&MemberKey {
                    group_id: *group_id,
                    person_id: *person_id,
                })
            })
            .map(|(id, _, _)| id)
            .collect();
        if stale.is_empty() {
            return Ok(0);
        }
        diesel::delete(members::table.filter(members::id.eq_any(&stale)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), MemberRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::update(members::table.find(id))
            .set(members::status.eq(status.code()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
