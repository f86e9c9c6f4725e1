//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: one in-process store behind every repository port
//! - **source**: legacy JSON table dumps behind the source export port
//! - **queue**: tokio worker pool behind the reconcile queue port
//! - **reports**: CSV rendering of report rows
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod queue;
pub mod reports;
pub mod source;

use std::sync::Arc;

use crate::domain::ports::{
    GroupRepository, MemberRepository, OfficerRepository, OwnerRepository, PersonRepository,
    StateLogRepository, UserAccountRepository,
};

use self::memory::InMemoryRoster;
use self::persistence::{
    DbPool, DieselGroupRepository, DieselMemberRepository, DieselOfficerRepository,
    DieselOwnerRepository, DieselPersonRepository, DieselStateLogRepository,
    DieselUserAccountRepository,
};

/// One implementation of every repository port.
#[derive(Clone)]
pub struct RosterStores {
    /// Groups.
    pub groups: Arc<dyn GroupRepository>,
    /// Persons.
    pub people: Arc<dyn PersonRepository>,
    /// Group memberships.
    pub members: Arc<dyn MemberRepository>,
    /// Officer roles.
    pub officers: Arc<dyn OfficerRepository>,
    /// Login accounts.
    pub accounts: Arc<dyn UserAccountRepository>,
    /// Owner links.
    pub owners: Arc<dyn OwnerRepository>,
    /// Status journal.
    pub state_log: Arc<dyn StateLogRepository>,
}

impl RosterStores {
    /// Diesel repositories sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            groups: Arc::new(DieselGroupRepository::new(pool.clone())),
            people: Arc::new(DieselPersonRepository::new(pool.clone())),
            members: Arc::new(DieselMemberRepository::new(pool.clone())),
            officers: Arc::new(DieselOfficerRepository::new(pool.clone())),
            accounts: Arc::new(DieselUserAccountRepository::new(pool.clone())),
            owners: Arc::new(DieselOwnerRepository::new(pool.clone())),
            state_log: Arc::new(DieselStateLogRepository::new(pool.clone())),
        }
    }

    /// Every port backed by the same in-memory store.
    pub fn in_memory(roster: &Arc<InMemoryRoster>) -> Self {
        Self {
            groups: roster.clone(),
            people: roster.clone(),
            members: roster.clone(),
            officers: roster.clone(),
            accounts: roster.clone(),
            owners: roster.clone(),
            state_log: roster.clone(),
        }
    }
}
