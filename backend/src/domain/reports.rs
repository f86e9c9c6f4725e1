//! Read-only roster projections for operator exports.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ports::{GroupRepository, PersonRepository};
use crate::domain::{Error, Group};

/// One active member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    /// External member number.
    #[serde(rename = "BHS ID")]
    pub bhs_id: Option<i32>,
    /// First name.
    #[serde(rename = "First Name")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "Last Name")]
    pub last_name: String,
    /// National membership expiry.
    #[serde(rename = "Expiration Date")]
    pub expiration: Option<NaiveDate>,
    /// Person status label.
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// One active quartet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuartetRow {
    /// Group id.
    #[serde(rename = "ID")]
    pub id: Uuid,
    /// Name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Kind label.
    #[serde(rename = "Kind")]
    pub kind: &'static str,
    /// District label.
    #[serde(rename = "District")]
    pub district: &'static str,
    /// Curated chapter affiliations.
    #[serde(rename = "Chapters")]
    pub chapters: String,
    /// Senior designation.
    #[serde(rename = "Senior?")]
    pub is_senior: bool,
    /// Youth designation.
    #[serde(rename = "Youth?")]
    pub is_youth: bool,
    /// External group number.
    #[serde(rename = "BHS ID")]
    pub bhs_id: Option<i32>,
    /// Legacy code.
    #[serde(rename = "Code")]
    pub code: String,
    /// Status label.
    #[serde(rename = "Status")]
    pub status: &'static str,
}

impl From<&Group> for QuartetRow {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            kind: group.kind.map_or("", |kind| kind.label()),
            district: group.district.map_or("", |district| district.label()),
            chapters: group.chapters.clone(),
            is_senior: group.is_senior,
            is_youth: group.is_youth,
            bhs_id: group.bhs_id,
            code: group.code.clone(),
            status: group.status.label(),
        }
    }
}

/// Builds report rows from the canonical store.
#[derive(Clone)]
pub struct ReportService {
    groups: Arc<dyn GroupRepository>,
    people: Arc<dyn PersonRepository>,
}

impl ReportService {
    /// Create a report service.
    pub fn new(groups: Arc<dyn GroupRepository>, people: Arc<dyn PersonRepository>) -> Self {
        Self { groups, people }
    }

    /// Active members of a group ordered by last then first name.
    pub async fn group_roster(&self, group_id: Uuid) -> Result<Vec<RosterRow>, Error> {
        if self.groups.find_by_id(group_id).await?.is_none() {
            return Err(Error::not_found(format!("group {group_id} not found")));
        }
        let mut people = self.people.list_active_members_of(group_id).await?;
        people.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(people
            .into_iter()
            .map(|person| RosterRow {
                bhs_id: person.bhs_id,
                first_name: person.first_name,
                last_name: person.last_name,
                expiration: person.current_through,
                status: person.status.label(),
            })
            .collect())
    }

    /// Active quartets ordered by name.
    pub async fn quartet_list(&self) -> Result<Vec<QuartetRow>, Error> {
        let mut quartets = self.groups.list_active_quartets().await?;
        quartets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(quartets.iter().map(QuartetRow::from).collect())
    }
}
