//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, MockClock};
use uuid::Uuid;

use crate::domain::{
    Group, GroupContact, GroupGender, GroupKind, GroupStatus, GroupUpsert, Person, PersonUpsert,
    Status, UserAccount,
};

pub fn person(id: Uuid, email: &str) -> Person {
    Person::from_upsert(person_upsert(id, email))
}

pub fn person_upsert(id: Uuid, email: &str) -> PersonUpsert {
    PersonUpsert {
        id,
        prefix: String::new(),
        first_name: "Pat".to_owned(),
        middle_name: String::new(),
        last_name: "Singer".to_owned(),
        nick_name: String::new(),
        suffix: String::new(),
        email: email.to_owned(),
        birth_date: None,
        home_phone: String::new(),
        cell_phone: String::new(),
        work_phone: String::new(),
        bhs_id: Some(100_001),
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

pub fn group(id: Uuid, kind: GroupKind) -> Group {
    Group::from_upsert(group_upsert(id, kind))
}

pub fn group_upsert(id: Uuid, kind: GroupKind) -> GroupUpsert {
    GroupUpsert {
        id,
        name: "Test Group".to_owned(),
        status: GroupStatus::Active,
        kind: Some(kind),
        gender: GroupGender::Male,
        district: None,
        division: None,
        bhs_id: Some(4242),
        code: String::new(),
        contact: GroupContact::default(),
        visitor_information: String::new(),
        start_date: None,
        parent_id: None,
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixture_timestamp());
    clock
        .expect_local()
        .returning(|| fixture_timestamp().with_timezone(&Local));
    Arc::new(clock)
}

pub fn account(id: Uuid, email: &str) -> UserAccount {
    UserAccount {
        id,
        email: email.to_owned(),
        name: "Pat Singer".to_owned(),
        first_name: "Pat".to_owned(),
        last_name: "Singer".to_owned(),
    }
}
