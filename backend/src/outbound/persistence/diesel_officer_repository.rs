//! PostgreSQL-backed `OfficerRepository` keyed on
//! `(person_id, group_id, office)`.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{OfficerRepository, OfficerRepositoryError};
use crate::domain::{Office, Officer, OfficerKey, OfficerUpsert, Status, Upserted};

use super::error_mapping::map_diesel_error;
use super::models::OfficerRow;
use super::pool::DbPool;
use super::schema::officers;

/// Diesel implementation of [`OfficerRepository`].
#[derive(Clone)]
pub struct DieselOfficerRepository {
    pool: DbPool,
}

impl DieselOfficerRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficerRepository for DieselOfficerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<OfficerRow> = officers::table
            .find(id)
            .select(OfficerRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(Officer::try_from).transpose()
    }

    async fn upsert(
        &self,
        upsert: OfficerUpsert,
    ) -> Result<Upserted<Officer>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, OfficerRepositoryError, _>(|conn| {
            async move {
                let key = upsert.key;
                let existing: Option<Uuid> = officers::table
                    .filter(officers::person_id.eq(key.person_id))
                    .filter(officers::group_id.eq(key.group_id))
                    .filter(officers::office.eq(key.office.code()))
                    .select(officers::id)
                    .first(conn)
                    .await
                    .optional()?;
                let created = existing.is_none();
                let id = existing.unwrap_or_else(Uuid::new_v4);

                let row = OfficerRow::from(&Officer::from_upsert(id, upsert));
                let stored: OfficerRow = diesel::insert_into(officers::table)
                    .values(&row)
                    .on_conflict((officers::person_id, officers::group_id, officers::office))
                    .do_update()
                    .set((
                        officers::status.eq(excluded(officers::status)),
                        officers::start_date.eq(excluded(officers::start_date)),
                        officers::end_date.eq(excluded(officers::end_date)),
                    ))
                    .returning(OfficerRow::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(Upserted {
                    value: Officer::try_from(stored)?,
                    created,
                })
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_orphans(
        &self,
        live_keys: &[OfficerKey],
    ) -> Result<usize, OfficerRepositoryError> {
        let mut conn = self.pool.get().await?;
        let live: HashSet<&OfficerKey> = live_keys.iter().collect();
        let existing: Vec<(Uuid, Uuid, Uuid, i32)> = officers::table
            .select((
                officers::id,
                officers::person_id,
                officers::group_id,
                officers::office,
            ))
            .load(&mut conn)
            .await?;

        let mut stale = Vec::new();
        for (id, person_id, group_id, office_code) in existing {
            let Some(office) = Office::from_code(office_code) else {
                warn!(%id, office_code, "officer row carries an unknown office; deleting");
                stale.push(id);
                continue;
            };
            let key = OfficerKey {
                person_id,
                group_id,
                office,
            };
            if !live.contains(&key) {
                stale.push(id);
            }
        }
        if stale.is_empty() {
            return Ok(0);
        }
        diesel::delete(officers::table.filter(officers::id.eq_any(&stale)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), OfficerRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::update(officers::table.find(id))
            .set(officers::status.eq(status.code()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
