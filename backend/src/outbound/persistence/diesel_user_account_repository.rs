//! PostgreSQL-backed `UserAccountRepository` keyed on email.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{AccountProfile, UserAccount};

use super::error_mapping::map_diesel_error;
use super::models::UserAccountRow;
use super::pool::DbPool;
use super::schema::user_accounts;

/// Diesel implementation of [`UserAccountRepository`].
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    /// Create a repository over the pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn upsert_by_email(
        &self,
        profile: AccountProfile,
    ) -> Result<UserAccount, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row = UserAccountRow {
            id: Uuid::new_v4(),
            email: profile.email,
            name: profile.name,
            first_name: profile.first_name,
            last_name: profile.last_name,
        };
        diesel::insert_into(user_accounts::table)
            .values(&row)
            .on_conflict(user_accounts::email)
            .do_update()
            .set((
                user_accounts::name.eq(excluded(user_accounts::name)),
                user_accounts::first_name.eq(excluded(user_accounts::first_name)),
                user_accounts::last_name.eq(excluded(user_accounts::last_name)),
            ))
            .returning(UserAccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(UserAccount::from)
            .map_err(map_diesel_error)
    }

}
