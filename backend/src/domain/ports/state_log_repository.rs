//! Port for the append-only status transition journal.

use async_trait::async_trait;

use crate::domain::StateLogEntry;

use super::{define_port_error, define_repository_error};

define_repository_error! {
    /// Errors raised by state log adapters.
    pub enum StateLogRepositoryError => "state log"
}

/// Append-only journal of status transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: StateLogEntry) -> Result<(), StateLogRepositoryError>;
}
