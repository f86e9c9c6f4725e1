//! Tests for officer reconciliation.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::fixtures;
use crate::domain::ports::{
    MockGroupRepository, MockOfficerRepository, MockOwnerRepository, MockPersonRepository,
    MockUserAccountRepository,
};
use crate::domain::{ErrorCode, GroupKind, Status};

const PERSON: Uuid = Uuid::from_u128(0x10);
const GROUP: Uuid = Uuid::from_u128(0x20);

#[fixture]
fn record() -> RoleRecord {
    RoleRecord {
        name: "Quartet Admin".to_owned(),
        human_id: PERSON,
        structure_id: GROUP,
        start_date: None,
        end_date: None,
        status: Status::Active,
    }
}

#[rstest]
#[case("manager", Office::Manager)]
#[case(" SCJC ", Office::Scjc)]
#[case("librarian", Office::Librarian)]
#[case("Quartet Admin", Office::Manager)]
#[case("", Office::Manager)]
fn maps_role_names_to_offices(#[case] name: &str, #[case] expected: Office) {
    assert_eq!(office_for_role(name), expected);
}

fn people_with(person: Option<crate::domain::Person>) -> MockPersonRepository {
    let mut people = MockPersonRepository::new();
    people.expect_find_by_id().return_once(move |_| Ok(person));
    people
}

fn groups_with(group: Option<crate::domain::Group>) -> MockGroupRepository {
    let mut groups = MockGroupRepository::new();
    groups.expect_find_by_id().return_once(move |_| Ok(group));
    groups
}

#[rstest]
#[tokio::test]
async fn upserts_manager_and_recomputes_group_owners(record: RoleRecord) {
    let account_id = Uuid::from_u128(0x99);
    let mut officers = MockOfficerRepository::new();
    officers
        .expect_upsert()
        .times(1)
        .withf(|upsert| {
            upsert.key
                == OfficerKey {
                    person_id: PERSON,
                    group_id: GROUP,
                    office: Office::Manager,
                }
                && upsert.status == Status::Active
        })
        .returning(|upsert| {
            Ok(Upserted {
                value: Officer::from_upsert(Uuid::from_u128(0x30), upsert),
                created: true,
            })
        });

    let mut accounts = MockUserAccountRepository::new();
    accounts
        .expect_upsert_by_email()
        .times(1)
        .returning(move |profile| Ok(fixtures::account(account_id, &profile.email)));
    let mut owners = MockOwnerRepository::new();
    owners
        .expect_recompute_group_owners()
        .times(1)
        .withf(|id| *id == GROUP)
        .return_once(move |_| Ok(vec![account_id]));

    let sync = OwnerSynchronizer::new(Arc::new(accounts), Arc::new(owners));
    let reconciler = OfficerReconciler::new(
        Arc::new(people_with(Some(fixtures::person(PERSON, "pat@example.com")))),
        Arc::new(groups_with(Some(fixtures::group(GROUP, GroupKind::Quartet)))),
        Arc::new(officers),
        sync,
    );
    let result = reconciler.upsert_officer(&record).await.expect("upsert");
    assert!(result.created);
    assert_eq!(result.value.key.office, Office::Manager);
}

#[rstest]
#[tokio::test]
async fn missing_person_is_not_found(record: RoleRecord) {
    let mut officers = MockOfficerRepository::new();
    officers.expect_upsert().never();
    let officers = Arc::new(officers);
    let sync = OwnerSynchronizer::new(
        Arc::new(MockUserAccountRepository::new()),
        Arc::new(MockOwnerRepository::new()),
    );
    let reconciler = OfficerReconciler::new(
        Arc::new(people_with(None)),
        Arc::new(MockGroupRepository::new()),
        officers,
        sync,
    );
    let err = reconciler
        .upsert_officer(&record)
        .await
        .expect_err("unresolved person");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.is_retryable());
}

#[rstest]
#[tokio::test]
async fn missing_group_is_not_found(record: RoleRecord) {
    let mut officers = MockOfficerRepository::new();
    officers.expect_upsert().never();
    let officers = Arc::new(officers);
    let sync = OwnerSynchronizer::new(
        Arc::new(MockUserAccountRepository::new()),
        Arc::new(MockOwnerRepository::new()),
    );
    let reconciler = OfficerReconciler::new(
        Arc::new(people_with(Some(fixtures::person(PERSON, "")))),
        Arc::new(groups_with(None)),
        officers,
        sync,
    );
    let err = reconciler
        .upsert_officer(&record)
        .await
        .expect_err("unresolved group");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
fn officer_key_uses_record_ids(record: RoleRecord) {
    let key = officer_key(&record);
    assert_eq!(key.person_id, PERSON);
    assert_eq!(key.group_id, GROUP);
    assert_eq!(key.office, Office::Manager);
}

fn dated(name: &str, start: Option<&str>, end: Option<&str>, status: Status) -> RoleRecord {
    let parse = |value: &str| value.parse::<chrono::NaiveDate>().expect("valid date");
    RoleRecord {
        name: name.to_owned(),
        human_id: PERSON,
        structure_id: GROUP,
        start_date: start.map(parse),
        end_date: end.map(parse),
        status,
    }
}

#[rstest]
fn roles_sharing_an_office_merge_to_one_record() {
    let president = dated(
        "Chapter President",
        Some("2015-01-01"),
        Some("2016-12-31"),
        Status::Inactive,
    );
    let secretary = dated("Chapter Secretary", Some("2012-06-01"), None, Status::Active);
    let librarian = dated("librarian", Some("2018-01-01"), Some("2019-01-01"), Status::Inactive);

    let merged = merge_roles_by_office(vec![president, secretary, librarian]);

    assert_eq!(merged.len(), 2);
    let manager = merged
        .iter()
        .find(|record| office_for_role(&record.name) == Office::Manager)
        .expect("manager record");
    assert_eq!(manager.name, "Chapter President");
    assert_eq!(manager.start_date, "2012-06-01".parse::<chrono::NaiveDate>().ok());
    assert_eq!(manager.end_date, None);
    assert_eq!(manager.status, Status::Active);
}

#[rstest]
fn merged_roles_do_not_depend_on_export_order() {
    let ended = dated("Chapter President", None, Some("2016-12-31"), Status::Inactive);
    let later = dated("Chapter Secretary", None, Some("2030-01-01"), Status::Active);

    let forward = merge_roles_by_office(vec![ended.clone(), later.clone()]);
    let backward = merge_roles_by_office(vec![later, ended]);

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].end_date, "2030-01-01".parse::<chrono::NaiveDate>().ok());
    assert_eq!(forward[0].status, Status::Active);
}
