//! Port for the legacy source export.
//!
//! A `None` cursor requests a full export, which is the only kind that may
//! be followed by orphan deletion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, HumanRecord, JoinRecord, RoleRecord, StructureRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by source export adapters.
    pub enum SourceExportError {
        /// The source could not be reached or read.
        Unavailable { message: String } =>
            "source export unavailable: {message}",
        /// The source returned rows that do not match the export contract.
        Malformed { message: String } =>
            "source export malformed: {message}",
    }
}

impl From<SourceExportError> for Error {
    fn from(error: SourceExportError) -> Self {
        match error {
            SourceExportError::Unavailable { .. } => Error::service_unavailable(error.to_string()),
            SourceExportError::Malformed { .. } => Error::invalid_request(error.to_string()),
        }
    }
}

/// Source of changed rows, one method per entity type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceExport: Send + Sync {
    /// Start a pass: the exports that follow read one consistent view of the
    /// source, taken no earlier than this call.
    async fn refresh(&self) -> Result<(), SourceExportError>;

    /// Live structures, parents before children.
    async fn export_structures(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<StructureRecord>, SourceExportError>;

    /// Live humans annotated with membership status.
    async fn export_humans(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<HumanRecord>, SourceExportError>;

    /// Roles aggregated per `(name, human, structure)`.
    async fn export_roles(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<RoleRecord>, SourceExportError>;

    /// Joins aggregated per `(structure, human)`.
    async fn export_joins(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<JoinRecord>, SourceExportError>;
}
