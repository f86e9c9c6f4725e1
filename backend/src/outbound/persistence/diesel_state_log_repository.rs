//! PostgreSQL-backed append-only `StateLogRepository`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::StateLogEntry;
use crate::domain::ports::{StateLogRepository, StateLogRepositoryError};

use super::error_mapping::map_diesel_error;
use super::models::NewStateLogRow;
use super::pool::DbPool;
use super::schema::state_log;

/// Diesel implementation of [`StateLogRepository`].
#[derive(Clone)]
pub struct DieselStateLogRepository {
    pool: DbPool,
}

impl DieselStateLogRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateLogRepository for DieselStateLogRepository {
    async fn append(&self, entry: StateLogEntry) -> Result<(), StateLogRepositoryError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(state_log::table)
            .values(NewStateLogRow::from(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
