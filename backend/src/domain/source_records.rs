//! Flat records produced by the legacy source export.
//!
//! These are the reconcilers' input contract. Token fields are kept as raw
//! strings; translation happens in the reconcilers via [`super::tokens`].
//! Records are serialisable so they can travel through a durable queue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::Status;

/// Organisational unit from the legacy `structures` view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureRecord {
    /// Source id, reused as the group id.
    pub id: Uuid,
    /// Raw name, possibly `"Harmonizers, The"`.
    pub name: Option<String>,
    /// Kind token.
    pub kind: Option<String>,
    /// Gender token.
    pub gender: Option<String>,
    /// Division display name.
    pub division: Option<String>,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Legacy chapter code.
    pub chapter_code: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Main phone.
    pub phone: Option<String>,
    /// Fax phone.
    pub fax: Option<String>,
    /// Facebook URL.
    pub facebook: Option<String>,
    /// Twitter URL.
    pub twitter: Option<String>,
    /// YouTube URL.
    pub youtube: Option<String>,
    /// Pinterest URL.
    pub pinterest: Option<String>,
    /// Flickr URL.
    pub flickr: Option<String>,
    /// Instagram URL.
    pub instagram: Option<String>,
    /// SoundCloud URL.
    pub soundcloud: Option<String>,
    /// Name awaiting approval.
    pub preferred_name: Option<String>,
    /// Visitor information.
    pub visitor_information: Option<String>,
    /// Established date.
    pub established_date: Option<NaiveDate>,
    /// Status UUID token.
    pub status_id: Option<String>,
    /// Parent structure id.
    pub parent_id: Option<Uuid>,
}

/// Individual from the legacy `humans` view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanRecord {
    /// Source id, reused as the person id.
    pub id: Uuid,
    /// First name, possibly carrying a title.
    pub first_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Last name, possibly carrying a suffix.
    pub last_name: Option<String>,
    /// Nickname.
    pub nick_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Birth date.
    pub birth_date: Option<NaiveDate>,
    /// Home phone.
    pub home_phone: Option<String>,
    /// Cell phone.
    pub cell_phone: Option<String>,
    /// Work phone.
    pub work_phone: Option<String>,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Gender token.
    pub gender: Option<String>,
    /// Voice part token.
    pub part: Option<String>,
    /// Legacy member-of-note value.
    pub mon: Option<i32>,
    /// Deceased flag.
    pub is_deceased: Option<bool>,
    /// Honorary flag.
    pub is_honorary: Option<bool>,
    /// Suspended flag.
    pub is_suspended: Option<bool>,
    /// Expelled flag.
    pub is_expelled: Option<bool>,
    /// Status derived from `current_through`.
    pub status: Option<Status>,
    /// Latest subscription expiry.
    pub current_through: Option<NaiveDate>,
}

/// Aggregated officer role from the legacy `roles` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Role name; mapped through the office table.
    pub name: String,
    /// Person holding the role.
    pub human_id: Uuid,
    /// Group the role belongs to.
    pub structure_id: Uuid,
    /// Earliest start across aggregated rows.
    pub start_date: Option<NaiveDate>,
    /// Latest end across aggregated rows; `None` when open-ended.
    pub end_date: Option<NaiveDate>,
    /// Status derived from `end_date`.
    pub status: Status,
}

/// Aggregated enrolment from the legacy `joins` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRecord {
    /// Group enrolled in.
    pub structure_id: Uuid,
    /// Person enrolled.
    pub human_id: Uuid,
    /// Voice part token from the most recently modified row.
    pub vocal_part: Option<String>,
    /// Earliest established date.
    pub start_date: Option<NaiveDate>,
    /// Derived end date; `None` when open-ended.
    pub end_date: Option<NaiveDate>,
    /// Status derived from `end_date`.
    pub status: Status,
}

/// Status of an aggregated role or enrolment: open-ended or not yet ended
/// counts as active.
pub fn status_from_end_date(end_date: Option<NaiveDate>, today: NaiveDate) -> Status {
    match end_date {
        None => Status::Active,
        Some(end) if end >= today => Status::Active,
        Some(_) => Status::Inactive,
    }
}
