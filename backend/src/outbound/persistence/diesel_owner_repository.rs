//! PostgreSQL-backed `OwnerRepository`.
//!
//! Each recompute locks the owning group or person row, reads the matching
//! accounts and replaces the owner set in one transaction. Concurrent
//! recomputes for the same row therefore serialize, and the last one to
//! commit always sees every officer committed before it started.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::Status;
use crate::domain::ports::{OwnerRepository, OwnerRepositoryError};

use super::error_mapping::map_diesel_error;
use super::models::{GroupOwnerRow, PersonOwnerRow};
use super::pool::DbPool;
use super::schema::{group_owners, groups, officers, person_owners, persons, user_accounts};

/// Diesel implementation of [`OwnerRepository`].
#[derive(Clone)]
pub struct DieselOwnerRepository {
    pool: DbPool,
}

impl DieselOwnerRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn officer_accounts(
    conn: &mut AsyncPgConnection,
    group_id: Uuid,
) -> QueryResult<Vec<Uuid>> {
    officers::table
        .inner_join(persons::table)
        .inner_join(user_accounts::table.on(user_accounts::email.eq(persons::email)))
        .filter(officers::group_id.eq(group_id))
        .filter(officers::status.eq(Status::Active.code()))
        .filter(persons::email.ne(""))
        .select(user_accounts::id)
        .distinct()
        .order_by(user_accounts::id)
        .load(conn)
        .await
}

async fn person_accounts(
    conn: &mut AsyncPgConnection,
    person_id: Uuid,
) -> QueryResult<Vec<Uuid>> {
    let email: Option<String> = persons::table
        .find(person_id)
        .select(persons::email)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(email) = email.filter(|email| !email.is_empty()) else {
        return Ok(Vec::new());
    };
    user_accounts::table
        .filter(user_accounts::email.eq(email))
        .select(user_accounts::id)
        .order_by(user_accounts::id)
        .load(conn)
        .await
}

#[async_trait]
impl OwnerRepository for DieselOwnerRepository {
    async fn recompute_group_owners(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, OwnerRepositoryError, _>(|conn| {
            async move {
                groups::table
                    .find(group_id)
                    .select(groups::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await
                    .optional()?;
                let account_ids = officer_accounts(conn, group_id).await?;
                diesel::delete(group_owners::table.filter(group_owners::group_id.eq(group_id)))
                    .execute(conn)
                    .await?;
                if !account_ids.is_empty() {
                    let rows: Vec<GroupOwnerRow> = account_ids
                        .iter()
                        .map(|account_id| GroupOwnerRow {
                            group_id,
                            account_id: *account_id,
                        })
                        .collect();
                    diesel::insert_into(group_owners::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok(account_ids)
            }
            .scope_boxed()
        })
        .await
    }

    async fn recompute_person_owners(
        &self,
        person_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, OwnerRepositoryError, _>(|conn| {
            async move {
                let account_ids = person_accounts(conn, person_id).await?;
                diesel::delete(
                    person_owners::table.filter(person_owners::person_id.eq(person_id)),
                )
                .execute(conn)
                .await?;
                if !account_ids.is_empty() {
                    let rows: Vec<PersonOwnerRow> = account_ids
                        .iter()
                        .map(|account_id| PersonOwnerRow {
                            person_id,
                            account_id: *account_id,
                        })
                        .collect();
                    diesel::insert_into(person_owners::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok(account_ids)
            }
            .scope_boxed()
        })
        .await
    }

    async fn group_owners(&self, group_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut conn = self.pool.get().await?;
        group_owners::table
            .filter(group_owners::group_id.eq(group_id))
            .select(group_owners::account_id)
            .order_by(group_owners::account_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn person_owners(&self, person_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut conn = self.pool.get().await?;
        person_owners::table
            .filter(person_owners::person_id.eq(person_id))
            .select(person_owners::account_id)
            .order_by(person_owners::account_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
