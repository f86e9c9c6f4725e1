//! Roster membership of a person in a group.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::person::VoicePart;
use super::status::Status;

/// Natural key of a member row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    /// Group the person belongs to.
    pub group_id: Uuid,
    /// Person on the roster.
    pub person_id: Uuid,
}

/// Fields owned by the member reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpsert {
    /// Natural key.
    pub key: MemberKey,
    /// Status derived from the enrolment dates.
    pub status: Status,
    /// Voice part sung in this group.
    pub part: Option<VoicePart>,
    /// Earliest enrolment date.
    pub start_date: Option<NaiveDate>,
    /// Latest enrolment end; `None` means open-ended.
    pub end_date: Option<NaiveDate>,
}

/// Persisted member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Internal id.
    pub id: Uuid,
    /// Natural key.
    pub key: MemberKey,
    /// Status.
    pub status: Status,
    /// Voice part.
    pub part: Option<VoicePart>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

impl Member {
    /// Build a member row with a fresh id.
    pub fn from_upsert(id: Uuid, upsert: MemberUpsert) -> Self {
        Self {
            id,
            key: upsert.key,
            status: upsert.status,
            part: upsert.part,
            start_date: upsert.start_date,
            end_date: upsert.end_date,
        }
    }
}
