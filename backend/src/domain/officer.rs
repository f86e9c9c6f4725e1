//! Officer positions held by persons within groups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coded_enum::define_coded_enum;
use super::status::Status;

define_coded_enum! {
    /// Office held by an officer.
    pub enum Office {
        /// Society Chairman of Judging.
        Scjc = (10, "scjc", "SCJC"),
        /// District Representative for Contest and Judging.
        Drcj = (20, "drcj", "DRCJ"),
        /// Contest Administrator.
        Ca = (30, "ca", "CA"),
        /// Judge.
        Judge = (40, "judge", "Judge"),
        /// Group manager; the default when the source names no office.
        Manager = (50, "manager", "Manager"),
        /// Librarian.
        Librarian = (60, "librarian", "Librarian"),
    }
}

/// Natural key of an officer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfficerKey {
    /// Person holding the office.
    pub person_id: Uuid,
    /// Group the office belongs to.
    pub group_id: Uuid,
    /// Office held.
    pub office: Office,
}

/// Fields owned by the officer reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerUpsert {
    /// Natural key.
    pub key: OfficerKey,
    /// Status derived from the role dates.
    pub status: Status,
    /// Earliest role start.
    pub start_date: Option<NaiveDate>,
    /// Latest role end; `None` means open-ended.
    pub end_date: Option<NaiveDate>,
}

/// Persisted officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    /// Internal id.
    pub id: Uuid,
    /// Natural key.
    pub key: OfficerKey,
    /// Status.
    pub status: Status,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

impl Officer {
    /// Build an officer row with a fresh id.
    pub fn from_upsert(id: Uuid, upsert: OfficerUpsert) -> Self {
        Self {
            id,
            key: upsert.key,
            status: upsert.status,
            start_date: upsert.start_date,
            end_date: upsert.end_date,
        }
    }
}

impl PartialOrd for Office {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Office {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.code().cmp(&other.code())
    }
}
