//! Canonical individual and their display helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coded_enum::define_coded_enum;
use super::status::Status;

define_coded_enum! {
    /// Singing voice part.
    pub enum VoicePart {
        /// Tenor.
        Tenor = (1, "tenor", "Tenor"),
        /// Lead.
        Lead = (2, "lead", "Lead"),
        /// Baritone.
        Baritone = (3, "baritone", "Baritone"),
        /// Bass.
        Bass = (4, "bass", "Bass"),
    }
}

define_coded_enum! {
    /// Gender recorded for a person.
    pub enum PersonGender {
        /// Male.
        Male = (10, "male", "Male"),
        /// Female.
        Female = (20, "female", "Female"),
    }
}

/// Fields owned by the person reconciler.
///
/// `status` and `current_through` seed new rows only; afterwards the member
/// reconciler owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpsert {
    /// Internal id, shared 1:1 with the source human id.
    pub id: Uuid,
    /// Title, e.g. `Dr.`.
    pub prefix: String,
    /// First name.
    pub first_name: String,
    /// Middle name.
    pub middle_name: String,
    /// Last name.
    pub last_name: String,
    /// Nickname.
    pub nick_name: String,
    /// Suffix, e.g. `Jr`.
    pub suffix: String,
    /// Validated lower-case email, or empty.
    pub email: String,
    /// Birth date.
    pub birth_date: Option<NaiveDate>,
    /// Home phone in E.164 form, or empty.
    pub home_phone: String,
    /// Cell phone in E.164 form, or empty.
    pub cell_phone: String,
    /// Work phone in E.164 form, or empty.
    pub work_phone: String,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Gender.
    pub gender: Option<PersonGender>,
    /// Voice part.
    pub part: Option<VoicePart>,
    /// Legacy member-of-note value.
    pub mon: Option<i32>,
    /// Deceased flag.
    pub is_deceased: bool,
    /// Honorary flag.
    pub is_honorary: bool,
    /// Suspended flag.
    pub is_suspended: bool,
    /// Expelled flag.
    pub is_expelled: bool,
    /// Initial status for new rows.
    pub initial_status: Status,
    /// Initial membership expiry for new rows.
    pub initial_current_through: Option<NaiveDate>,
}

/// Persisted person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Internal id.
    pub id: Uuid,
    /// Status.
    pub status: Status,
    /// Title.
    pub prefix: String,
    /// First name.
    pub first_name: String,
    /// Middle name.
    pub middle_name: String,
    /// Last name.
    pub last_name: String,
    /// Nickname.
    pub nick_name: String,
    /// Suffix.
    pub suffix: String,
    /// Birth date.
    pub birth_date: Option<NaiveDate>,
    /// Staff-curated spouse name.
    pub spouse: String,
    /// Staff-curated location.
    pub location: String,
    /// Voice part.
    pub part: Option<VoicePart>,
    /// Legacy member-of-note value.
    pub mon: Option<i32>,
    /// Gender.
    pub gender: Option<PersonGender>,
    /// Deceased flag.
    pub is_deceased: bool,
    /// Honorary flag.
    pub is_honorary: bool,
    /// Suspended flag.
    pub is_suspended: bool,
    /// Expelled flag.
    pub is_expelled: bool,
    /// Email, or empty.
    pub email: String,
    /// Home phone.
    pub home_phone: String,
    /// Work phone.
    pub work_phone: String,
    /// Cell phone.
    pub cell_phone: String,
    /// Staff-curated description.
    pub description: String,
    /// Staff-curated notes.
    pub notes: String,
    /// External numeric id.
    pub bhs_id: Option<i32>,
    /// Membership expiry.
    pub current_through: Option<NaiveDate>,
}

impl Person {
    /// Build a freshly inserted person from an upsert payload.
    pub fn from_upsert(upsert: PersonUpsert) -> Self {
        Self {
            id: upsert.id,
            status: upsert.initial_status,
            prefix: upsert.prefix,
            first_name: upsert.first_name,
            middle_name: upsert.middle_name,
            last_name: upsert.last_name,
            nick_name: upsert.nick_name,
            suffix: upsert.suffix,
            birth_date: upsert.birth_date,
            spouse: String::new(),
            location: String::new(),
            part: upsert.part,
            mon: upsert.mon,
            gender: upsert.gender,
            is_deceased: upsert.is_deceased,
            is_honorary: upsert.is_honorary,
            is_suspended: upsert.is_suspended,
            is_expelled: upsert.is_expelled,
            email: upsert.email,
            home_phone: upsert.home_phone,
            work_phone: upsert.work_phone,
            cell_phone: upsert.cell_phone,
            description: String::new(),
            notes: String::new(),
            bhs_id: upsert.bhs_id,
            current_through: upsert.initial_current_through,
        }
    }

    /// Overwrite reconciler-owned fields. Status, membership expiry and
    /// curated text are left intact.
    pub fn apply_upsert(&mut self, upsert: PersonUpsert) {
        self.prefix = upsert.prefix;
        self.first_name = upsert.first_name;
        self.middle_name = upsert.middle_name;
        self.last_name = upsert.last_name;
        self.nick_name = upsert.nick_name;
        self.suffix = upsert.suffix;
        self.email = upsert.email;
        self.birth_date = upsert.birth_date;
        self.home_phone = upsert.home_phone;
        self.cell_phone = upsert.cell_phone;
        self.work_phone = upsert.work_phone;
        self.bhs_id = upsert.bhs_id;
        self.gender = upsert.gender;
        self.part = upsert.part;
        self.mon = upsert.mon;
        self.is_deceased = upsert.is_deceased;
        self.is_honorary = upsert.is_honorary;
        self.is_suspended = upsert.is_suspended;
        self.is_expelled = upsert.is_expelled;
    }

    /// Nickname (or first name) followed by last name.
    pub fn common_name(&self) -> String {
        let first = if self.nick_name.is_empty() {
            &self.first_name
        } else {
            &self.nick_name
        };
        format!("{first} {}", self.last_name)
    }

    /// First, middle and last name with the nickname in parentheses.
    pub fn full_name(&self) -> String {
        let nick = if self.nick_name.is_empty() {
            String::new()
        } else {
            format!("({})", self.nick_name)
        };
        squash_spaces(&[
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &nick,
        ])
    }

    /// `Last, First`.
    pub fn sort_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Upper-case initials from the common first name and last name, or `--`.
    pub fn initials(&self) -> String {
        let first = if self.nick_name.is_empty() {
            &self.first_name
        } else {
            &self.nick_name
        };
        match (first.chars().next(), self.last_name.chars().next()) {
            (Some(one), Some(two)) => one.to_uppercase().chain(two.to_uppercase()).collect(),
            _ => "--".to_owned(),
        }
    }

    /// Operator-facing label including the external id.
    pub fn nomen(&self) -> String {
        let suffix = match self.bhs_id {
            Some(bhs_id) => format!("[{bhs_id}]"),
            None => "[No BHS ID]".to_owned(),
        };
        format!("{} {suffix}", self.full_name())
    }
}

fn squash_spaces(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn upsert() -> PersonUpsert {
        PersonUpsert {
            id: Uuid::nil(),
            prefix: String::new(),
            first_name: "Robert".to_owned(),
            middle_name: String::new(),
            last_name: "Smith".to_owned(),
            nick_name: "Bob".to_owned(),
            suffix: String::new(),
            email: String::new(),
            birth_date: None,
            home_phone: String::new(),
            cell_phone: String::new(),
            work_phone: String::new(),
            bhs_id: Some(12345),
            gender: None,
            part: None,
            mon: None,
            is_deceased: false,
            is_honorary: false,
            is_suspended: false,
            is_expelled: false,
            initial_status: Status::New,
            initial_current_through: None,
        }
    }

    #[fixture]
    fn person(upsert: PersonUpsert) -> Person {
        Person::from_upsert(upsert)
    }

    #[rstest]
    fn common_name_prefers_nickname(person: Person) {
        assert_eq!(person.common_name(), "Bob Smith");
    }

    #[rstest]
    fn full_name_skips_blank_parts(person: Person) {
        assert_eq!(person.full_name(), "Robert Smith (Bob)");
        assert_eq!(person.nomen(), "Robert Smith (Bob) [12345]");
    }

    #[rstest]
    fn sort_name_is_last_comma_first(person: Person) {
        assert_eq!(person.sort_name(), "Smith, Robert");
    }

    #[rstest]
    fn initials_use_common_first_name(mut person: Person) {
        assert_eq!(person.initials(), "BS");
        person.nick_name.clear();
        person.first_name = "ólafur".to_owned();
        assert_eq!(person.initials(), "ÓS");
        person.last_name.clear();
        assert_eq!(person.initials(), "--");
    }

    #[rstest]
    fn apply_upsert_keeps_membership_fields(mut person: Person, mut upsert: PersonUpsert) {
        person.status = Status::Active;
        person.notes = "tag singer".to_owned();
        upsert.first_name = "Rob".to_owned();
        upsert.part = Some(VoicePart::Bass);
        upsert.initial_status = Status::Inactive;

        person.apply_upsert(upsert);

        assert_eq!(person.status, Status::Active);
        assert_eq!(person.notes, "tag singer");
        assert_eq!(person.first_name, "Rob");
        assert_eq!(person.part, Some(VoicePart::Bass));
    }
}
