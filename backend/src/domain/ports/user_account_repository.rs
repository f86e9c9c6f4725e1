//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{AccountProfile, UserAccount};

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by user account repository adapters.
    pub enum UserAccountRepositoryError => "user account repository"
}

/// Port for accounts keyed by email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Insert or update the account with this email, mirroring name fields.
    async fn upsert_by_email(
        &self,
        profile: AccountProfile,
    ) -> Result<UserAccount, UserAccountRepositoryError>;
}
