//! PostgreSQL-backed `PersonRepository`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PersonRepository, PersonRepositoryError};
use crate::domain::{Person, PersonUpsert, Status, Upserted};

use super::error_mapping::map_diesel_error;
use super::models::PersonRow;
use super::pool::DbPool;
use super::schema::{members, persons};

/// Diesel implementation of [`PersonRepository`].
#[derive(Clone)]
pub struct DieselPersonRepository {
    pool: DbPool,
}

impl DieselPersonRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for DieselPersonRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<PersonRow> = persons::table
            .find(id)
            .select(PersonRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(Person::try_from).transpose()
    }

    async fn upsert(
        &self,
        upsert: PersonUpsert,
    ) -> Result<Upserted<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, PersonRepositoryError, _>(|conn| {
            async move {
                let existing: Option<PersonRow> = persons::table
                    .find(upsert.id)
                    .select(PersonRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let created = existing.is_none();
                // Status and expiry on an existing row belong to the member
                // reconciler.
                let person = match existing {
                    Some(row) => {
                        let mut person = Person::try_from(row)?;
                        person.apply_upsert(upsert);
                        person
                    }
                    None => Person::from_upsert(upsert),
                };

                let row = PersonRow::from(&person);
                diesel::insert_into(persons::table)
                    .values(&row)
                    .on_conflict(persons::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .await?;
                Ok(Upserted {
                    value: person,
                    created,
                })
            }
            .scope_boxed()
        })
        .await
    }

    async fn record_membership(
        &self,
        id: Uuid,
        status: Status,
        current_through: Option<NaiveDate>,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<PersonRow> = diesel::update(persons::table.find(id))
            .set((
                persons::status.eq(status.code()),
                persons::current_through.eq(current_through),
            ))
            .returning(PersonRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        row.map(Person::try_from).transpose()
    }

    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::delete(persons::table.filter(persons::id.ne_all(live_ids)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_active_members_of(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        let active_members = members::table
            .filter(members::group_id.eq(group_id))
            .filter(members::status.eq(Status::Active.code()))
            .select(members::person_id);
        let rows: Vec<PersonRow> = persons::table
            .filter(persons::id.eq_any(active_members))
            .order_by((persons::last_name, persons::first_name))
            .select(PersonRow::as_select())
            .load(&mut conn)
            .await?;
        rows.into_iter().map(Person::try_from).collect()
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), PersonRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::update(persons::table.find(id))
            .set(persons::status.eq(status.code()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
