//! Internal Diesel row structs and their domain conversions.
//!
//! Enumerations are stored as integer codes; reading an unknown code is a
//! query error rather than a silent default.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::{
    GroupRepositoryError, MemberRepositoryError, OfficerRepositoryError, PersonRepositoryError,
};
use crate::domain::{
    District, Division, Group, GroupContact, GroupGender, GroupKind, GroupStatus, Member,
    MemberKey, Office, Officer, OfficerKey, Person, PersonGender, StateLogEntry, Status,
    TreeNode, UserAccount, VoicePart,
};

use super::error_mapping::{decode, decode_optional};
use super::schema::{
    group_owners, groups, members, officers, person_owners, persons, state_log, user_accounts,
};

/// Full groups row, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = groups, treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: Uuid,
    pub name: String,
    pub status: i32,
    pub kind: Option<i32>,
    pub gender: i32,
    pub district: Option<i32>,
    pub division: Option<i32>,
    pub bhs_id: Option<i32>,
    pub code: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub fax_phone: String,
    pub facebook: String,
    pub twitter: String,
    pub youtube: String,
    pub pinterest: String,
    pub flickr: String,
    pub instagram: String,
    pub soundcloud: String,
    pub visitor_information: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    pub description: String,
    pub notes: String,
    pub participants: String,
    pub chapters: String,
    pub is_senior: bool,
    pub is_youth: bool,
    pub tree_sort: Option<i32>,
    pub parent_id: Option<Uuid>,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        let contact = group.contact.clone();
        Self {
            id: group.id,
            name: group.name.clone(),
            status: group.status.code(),
            kind: group.kind.map(|kind| kind.code()),
            gender: group.gender.code(),
            district: group.district.map(|district| district.code()),
            division: group.division.map(|division| division.code()),
            bhs_id: group.bhs_id,
            code: group.code.clone(),
            website: contact.website,
            email: contact.email,
            phone: contact.phone,
            fax_phone: contact.fax_phone,
            facebook: contact.facebook,
            twitter: contact.twitter,
            youtube: contact.youtube,
            pinterest: contact.pinterest,
            flickr: contact.flickr,
            instagram: contact.instagram,
            soundcloud: contact.soundcloud,
            visitor_information: group.visitor_information.clone(),
            start_date: group.start_date,
            end_date: group.end_date,
            location: group.location.clone(),
            description: group.description.clone(),
            notes: group.notes.clone(),
            participants: group.participants.clone(),
            chapters: group.chapters.clone(),
            is_senior: group.is_senior,
            is_youth: group.is_youth,
            tree_sort: group.tree_sort,
            parent_id: group.parent_id,
        }
    }
}

impl TryFrom<GroupRow> for Group {
    type Error = GroupRepositoryError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            status: decode::<_, Self::Error>(row.status, "group status", GroupStatus::from_code)?,
            kind: decode_optional::<_, Self::Error>(row.kind, "group kind", GroupKind::from_code)?,
            gender: decode::<_, Self::Error>(row.gender, "group gender", GroupGender::from_code)?,
            district: decode_optional::<_, Self::Error>(row.district, "district", District::from_code)?,
            division: decode_optional::<_, Self::Error>(row.division, "division", Division::from_code)?,
            bhs_id: row.bhs_id,
            code: row.code,
            contact: GroupContact {
                website: row.website,
                email: row.email,
                phone: row.phone,
                fax_phone: row.fax_phone,
                facebook: row.facebook,
                twitter: row.twitter,
                youtube: row.youtube,
                pinterest: row.pinterest,
                flickr: row.flickr,
                instagram: row.instagram,
                soundcloud: row.soundcloud,
            },
            visitor_information: row.visitor_information,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            description: row.description,
            notes: row.notes,
            participants: row.participants,
            chapters: row.chapters,
            is_senior: row.is_senior,
            is_youth: row.is_youth,
            tree_sort: row.tree_sort,
            parent_id: row.parent_id,
        })
    }
}

/// Projection read by the tree sort.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TreeNodeRow {
    pub id: Uuid,
    pub name: String,
    pub kind: Option<i32>,
    pub code: String,
    pub parent_id: Option<Uuid>,
}

impl TryFrom<TreeNodeRow> for TreeNode {
    type Error = GroupRepositoryError;

    fn try_from(row: TreeNodeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            kind: decode_optional::<_, Self::Error>(row.kind, "group kind", GroupKind::from_code)?,
            code: row.code,
            parent_id: row.parent_id,
        })
    }
}

/// Full persons row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = persons, treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PersonRow {
    pub id: Uuid,
    pub status: i32,
    pub prefix: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub nick_name: String,
    pub suffix: String,
    pub birth_date: Option<NaiveDate>,
    pub spouse: String,
    pub location: String,
    pub part: Option<i32>,
    pub mon: Option<i32>,
    pub gender: Option<i32>,
    pub is_deceased: bool,
    pub is_honorary: bool,
    pub is_suspended: bool,
    pub is_expelled: bool,
    pub email: String,
    pub home_phone: String,
    pub work_phone: String,
    pub cell_phone: String,
    pub description: String,
    pub notes: String,
    pub bhs_id: Option<i32>,
    pub current_through: Option<NaiveDate>,
}

impl From<&Person> for PersonRow {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            status: person.status.code(),
            prefix: person.prefix.clone(),
            first_name: person.first_name.clone(),
            middle_name: person.middle_name.clone(),
            last_name: person.last_name.clone(),
            nick_name: person.nick_name.clone(),
            suffix: person.suffix.clone(),
            birth_date: person.birth_date,
            spouse: person.spouse.clone(),
            location: person.location.clone(),
            part: person.part.map(|part| part.code()),
            mon: person.mon,
            gender: person.gender.map(|gender| gender.code()),
            is_deceased: person.is_deceased,
            is_honorary: person.is_honorary,
            is_suspended: person.is_suspended,
            is_expelled: person.is_expelled,
            email: person.email.clone(),
            home_phone: person.home_phone.clone(),
            work_phone: person.work_phone.clone(),
            cell_phone: person.cell_phone.clone(),
            description: person.description.clone(),
            notes: person.notes.clone(),
            bhs_id: person.bhs_id,
            current_through: person.current_through,
        }
    }
}

impl TryFrom<PersonRow> for Person {
    type Error = PersonRepositoryError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            status: decode::<_, Self::Error>(row.status, "person status", Status::from_code)?,
            prefix: row.prefix,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            nick_name: row.nick_name,
            suffix: row.suffix,
            birth_date: row.birth_date,
            spouse: row.spouse,
            location: row.location,
            part: decode_optional::<_, Self::Error>(row.part, "voice part", VoicePart::from_code)?,
            mon: row.mon,
            gender: decode_optional::<_, Self::Error>(row.gender, "person gender", PersonGender::from_code)?,
            is_deceased: row.is_deceased,
            is_honorary: row.is_honorary,
            is_suspended: row.is_suspended,
            is_expelled: row.is_expelled,
            email: row.email,
            home_phone: row.home_phone,
            work_phone: row.work_phone,
            cell_phone: row.cell_phone,
            description: row.description,
            notes: row.notes,
            bhs_id: row.bhs_id,
            current_through: row.current_through,
        })
    }
}

/// Members row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub person_id: Uuid,
    pub status: i32,
    pub part: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<&Member> for MemberRow {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            group_id: member.key.group_id,
            person_id: member.key.person_id,
            status: member.status.code(),
            part: member.part.map(|part| part.code()),
            start_date: member.start_date,
            end_date: member.end_date,
        }
    }
}

impl TryFrom<MemberRow> for Member {
    type Error = MemberRepositoryError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            key: MemberKey {
                group_id: row.group_id,
                person_id: row.person_id,
            },
            status: decode::<_, Self::Error>(row.status, "member status", Status::from_code)?,
            part: decode_optional::<_, Self::Error>(row.part, "voice part", VoicePart::from_code)?,
            start_date: row.start_date,
            end_date: row.end_date,
        })
    }
}

/// Officers row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = officers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfficerRow {
    pub id: Uuid,
    pub person_id: Uuid,
    pub group_id: Uuid,
    pub office: i32,
    pub status: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<&Officer> for OfficerRow {
    fn from(officer: &Officer) -> Self {
        Self {
            id: officer.id,
            person_id: officer.key.person_id,
            group_id: officer.key.group_id,
            office: officer.key.office.code(),
            status: officer.status.code(),
            start_date: officer.start_date,
            end_date: officer.end_date,
        }
    }
}

impl TryFrom<OfficerRow> for Officer {
    type Error = OfficerRepositoryError;

    fn try_from(row: OfficerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            key: OfficerKey {
                person_id: row.person_id,
                group_id: row.group_id,
                office: decode::<_, Self::Error>(row.office, "office", Office::from_code)?,
            },
            status: decode::<_, Self::Error>(row.status, "officer status", Status::from_code)?,
            start_date: row.start_date,
            end_date: row.end_date,
        })
    }
}

/// User account row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

/// Group owner link.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = group_owners)]
pub(crate) struct GroupOwnerRow {
    pub group_id: Uuid,
    pub account_id: Uuid,
}

/// Person owner link.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = person_owners)]
pub(crate) struct PersonOwnerRow {
    pub person_id: Uuid,
    pub account_id: Uuid,
}

/// Journal insert; `id` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = state_log)]
pub(crate) struct NewStateLogRow {
    pub entity: i32,
    pub entity_id: Uuid,
    pub from_state: String,
    pub to_state: String,
    pub event: String,
    pub actor: Option<String>,
    pub description: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<StateLogEntry> for NewStateLogRow {
    fn from(entry: StateLogEntry) -> Self {
        Self {
            entity: entry.entity.code(),
            entity_id: entry.entity_id,
            from_state: entry.from_state,
            to_state: entry.to_state,
            event: entry.event.as_str().to_owned(),
            actor: entry.actor,
            description: entry.description,
            recorded_at: entry.recorded_at,
        }
    }
}
