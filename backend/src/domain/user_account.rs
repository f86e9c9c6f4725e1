//! User accounts linked to groups and persons as owners.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::person::Person;

/// Name fields mirrored onto an account keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Lower-case email; the account's natural key.
    pub email: String,
    /// Common name of the person.
    pub name: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl AccountProfile {
    /// Mirror a person's name onto an account profile.
    ///
    /// Returns `None` when the person has no email.
    pub fn for_person(person: &Person) -> Option<Self> {
        if person.email.is_empty() {
            return None;
        }
        Some(Self {
            email: person.email.clone(),
            name: person.common_name(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
        })
    }
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Internal id.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}
