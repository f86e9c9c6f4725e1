//! Owner and account synchronisation.
//!
//! Owners are always recomputed and set-assigned in full, so a person who
//! loses an office also loses ownership of the group on the next sync.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{OwnerRepository, UserAccountRepository};
use crate::domain::{AccountProfile, Error, Person, UserAccount};

/// Keeps user accounts and `owners` relations in step with the roster.
#[derive(Clone)]
pub struct OwnerSynchronizer {
    accounts: Arc<dyn UserAccountRepository>,
    owners: Arc<dyn OwnerRepository>,
}

impl OwnerSynchronizer {
    /// Create a synchroniser over the given repositories.
    pub fn new(
        accounts: Arc<dyn UserAccountRepository>,
        owners: Arc<dyn OwnerRepository>,
    ) -> Self {
        Self { accounts, owners }
    }

    /// Upsert the account matching the person's email, mirroring name
    /// fields. Persons without an email get no account.
    pub async fn ensure_account(&self, person: &Person) -> Result<Option<UserAccount>, Error> {
        let Some(profile) = AccountProfile::for_person(person) else {
            return Ok(None);
        };
        let account = self.accounts.upsert_by_email(profile).await?;
        Ok(Some(account))
    }

    /// Set a person's owners to the accounts sharing their email.
    pub async fn sync_person_owners(&self, person: &Person) -> Result<Vec<Uuid>, Error> {
        let account_ids = self.owners.recompute_person_owners(person.id).await?;
        debug!(person_id = %person.id, owners = account_ids.len(), "person owners replaced");
        Ok(account_ids)
    }

    /// Set a group's owners to the accounts of its active officers.
    ///
    /// The adapter reads the officers and writes the owners in one step, so
    /// two officer upserts racing on the same group cannot drop an owner.
    pub async fn sync_group_owners(&self, group_id: Uuid) -> Result<Vec<Uuid>, Error> {
        let account_ids = self.owners.recompute_group_owners(group_id).await?;
        debug!(group_id = %group_id, owners = account_ids.len(), "group owners replaced");
        Ok(account_ids)
    }
}

#[cfg(test)]
#[path = "owner_sync_tests.rs"]
mod tests;
