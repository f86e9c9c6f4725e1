//! Integration tests for the Diesel roster repositories against embedded
//! PostgreSQL.
//!
//! Each test runs in its own database cloned from a migrated template. Set
//! `SKIP_TEST_CLUSTER=1` to skip when the cluster cannot start.

mod pg_support;

use std::sync::Arc;

use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use diesel::{Connection, RunQueryDsl};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use roster_backend::domain::ports::{
    GroupRepository, MemberRepository, OfficerRepository, OwnerRepository, PersonRepository,
    UserAccountRepository,
};
use roster_backend::domain::{
    AccountProfile, GroupContact, GroupGender, GroupKind, GroupStatus, GroupUpsert, MemberKey,
    MemberUpsert, Office, OfficerKey, OfficerUpsert, PersonUpsert, Status, VoicePart,
};
use roster_backend::outbound::persistence::{
    DbPool, DieselGroupRepository, DieselMemberRepository, DieselOfficerRepository,
    DieselOwnerRepository, DieselPersonRepository, DieselUserAccountRepository, PoolConfig,
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

use pg_support::{handle_cluster_setup_failure, provision_database, shared_cluster};

// Field order is drop order: repositories release their pool while the
// runtime is alive, and the database is dropped last.
struct TestContext {
    groups: DieselGroupRepository,
    persons: DieselPersonRepository,
    officers: DieselOfficerRepository,
    members: DieselMemberRepository,
    accounts: DieselUserAccountRepository,
    owners: Arc<DieselOwnerRepository>,
    runtime: Runtime,
    database: TemporaryDatabase,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Write staff-curated columns the reconcilers never touch.
    fn curate_group(&self, id: Uuid, notes: &str) {
        let mut conn = PgConnection::establish(self.database.url()).expect("direct connection");
        diesel::sql_query("UPDATE groups SET notes = $1, location = $1 WHERE id = $2")
            .bind::<Text, _>(notes)
            .bind::<SqlUuid, _>(id)
            .execute(&mut conn)
            .expect("curate group");
    }

    fn seed_group(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.block_on(self.groups.upsert(group_upsert(id, name)))
            .expect("seed group");
        id
    }

    fn seed_person(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.block_on(self.persons.upsert(person_upsert(id, "Pat", email)))
            .expect("seed person");
        id
    }

    fn seed_account(&self, email: &str) -> Uuid {
        self.block_on(self.accounts.upsert_by_email(profile(email)))
            .expect("seed account")
            .id
    }
}

fn setup_context() -> Result<TestContext, String> {
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::for_workers(database.url(), 4)))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        groups: DieselGroupRepository::new(pool.clone()),
        persons: DieselPersonRepository::new(pool.clone()),
        officers: DieselOfficerRepository::new(pool.clone()),
        members: DieselMemberRepository::new(pool.clone()),
        accounts: DieselUserAccountRepository::new(pool.clone()),
        owners: Arc::new(DieselOwnerRepository::new(pool)),
        runtime,
        database,
    })
}

#[fixture]
fn roster_db() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn group_upsert(id: Uuid, name: &str) -> GroupUpsert {
    GroupUpsert {
        id,
        name: name.to_owned(),
        status: GroupStatus::Active,
        kind: Some(GroupKind::Chapter),
        gender: GroupGender::Male,
        district: None,
        division: None,
        bhs_id: None,
        code: String::new(),
        contact: GroupContact::default(),
        visitor_information: String::new(),
        start_date: None,
        parent_id: None,
    }
}

fn person_upsert(id: Uuid, first_name: &str, email: &str) -> PersonUpsert {
    PersonUpsert {
        id,
        prefix: String::new(),
        first_name: first_name.to_owned(),
        middle_name: String::new(),
        last_name: "Singer".to_owned(),
        nick_name: String::new(),
        suffix: String::new(),
        email: email.to_owned(),
        birth_date: None,
        home_phone: String::new(),
        cell_phone: String::new(),
        work_phone: String::new(),
        bhs_id: None,
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

fn profile(email: &str) -> AccountProfile {
    AccountProfile {
        email: email.to_owned(),
        name: "Pat Singer".to_owned(),
        first_name: "Pat".to_owned(),
        last_name: "Singer".to_owned(),
    }
}

fn officer(person_id: Uuid, group_id: Uuid, office: Office, status: Status) -> OfficerUpsert {
    OfficerUpsert {
        key: OfficerKey {
            person_id,
            group_id,
            office,
        },
        status,
        start_date: None,
        end_date: None,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[rstest]
fn group_upsert_keeps_curated_fields_and_tree_sort(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: group_upsert_keeps_curated_fields_and_tree_sort skipped");
        return;
    };
    let id = Uuid::new_v4();
    let first = ctx
        .block_on(ctx.groups.upsert(group_upsert(id, "Harmony Hall")))
        .expect("insert group");
    assert!(first.created);

    ctx.block_on(ctx.groups.set_is_senior(id, true))
        .expect("set senior");
    ctx.block_on(ctx.groups.replace_tree_sort(&[(id, 1)]))
        .expect("assign tree sort");
    ctx.curate_group(id, "curated by staff");

    let second = ctx
        .block_on(ctx.groups.upsert(group_upsert(id, "Harmony Hall Chorus")))
        .expect("update group");
    assert!(!second.created);

    let stored = ctx
        .block_on(ctx.groups.find_by_id(id))
        .expect("load group")
        .expect("group exists");
    assert_eq!(stored.name, "Harmony Hall Chorus");
    assert!(stored.is_senior);
    assert_eq!(stored.tree_sort, Some(1));
    assert_eq!(stored.notes, "curated by staff");
    assert_eq!(stored.location, "curated by staff");
}

#[rstest]
fn person_upsert_leaves_membership_fields_alone(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: person_upsert_leaves_membership_fields_alone skipped");
        return;
    };
    let id = ctx.seed_person("pat@example.com");
    let through = date(2025, 6, 30);
    ctx.block_on(ctx.persons.record_membership(id, Status::Active, Some(through)))
        .expect("record membership");

    let mut update = person_upsert(id, "Patricia", "pat@example.com");
    update.initial_status = Status::Inactive;
    update.initial_current_through = None;
    let upserted = ctx
        .block_on(ctx.persons.upsert(update))
        .expect("update person");

    assert!(!upserted.created);
    let stored = ctx
        .block_on(ctx.persons.find_by_id(id))
        .expect("load person")
        .expect("person exists");
    assert_eq!(stored.first_name, "Patricia");
    assert_eq!(stored.status, Status::Active);
    assert_eq!(stored.current_through, Some(through));
}

#[rstest]
fn delete_orphans_keeps_only_live_groups(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: delete_orphans_keeps_only_live_groups skipped");
        return;
    };
    let live = ctx.seed_group("Live");
    let stale = ctx.seed_group("Stale");
    let person = ctx.seed_person("");
    ctx.block_on(
        ctx.officers
            .upsert(officer(person, stale, Office::Manager, Status::Active)),
    )
    .expect("seed officer");

    let deleted = ctx
        .block_on(ctx.groups.delete_orphans(&[live]))
        .expect("delete orphans");

    assert_eq!(deleted, 1);
    assert!(ctx.block_on(ctx.groups.find_by_id(live)).expect("load").is_some());
    assert!(ctx.block_on(ctx.groups.find_by_id(stale)).expect("load").is_none());
    let officers_left = ctx
        .block_on(ctx.officers.delete_orphans(&[]))
        .expect("officer orphans");
    assert_eq!(officers_left, 0, "officers cascade with their group");
}

#[rstest]
fn empty_live_list_deletes_every_row(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: empty_live_list_deletes_every_row skipped");
        return;
    };
    ctx.seed_group("One");
    ctx.seed_group("Two");
    ctx.seed_person("one@example.com");

    let groups = ctx
        .block_on(ctx.groups.delete_orphans(&[]))
        .expect("delete groups");
    let persons = ctx
        .block_on(ctx.persons.delete_orphans(&[]))
        .expect("delete persons");

    assert_eq!((groups, persons), (2, 1));
    let nodes = ctx
        .block_on(ctx.groups.list_tree_nodes())
        .expect("list nodes");
    assert!(nodes.is_empty());
}

#[rstest]
fn replace_tree_sort_swaps_positions_under_the_unique_constraint(
    roster_db: Option<TestContext>,
) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: replace_tree_sort_swaps_positions skipped");
        return;
    };
    let first = ctx.seed_group("First");
    let second = ctx.seed_group("Second");
    let unsorted = ctx.seed_group("Unsorted");
    ctx.block_on(ctx.groups.replace_tree_sort(&[(first, 1), (second, 2), (unsorted, 3)]))
        .expect("initial sort");

    ctx.block_on(ctx.groups.replace_tree_sort(&[(first, 2), (second, 1)]))
        .expect("swapped sort");

    let sort_of = |id| {
        ctx.block_on(ctx.groups.find_by_id(id))
            .expect("load group")
            .expect("group exists")
            .tree_sort
    };
    assert_eq!(sort_of(first), Some(2));
    assert_eq!(sort_of(second), Some(1));
    assert_eq!(sort_of(unsorted), None);
}

#[rstest]
fn officer_upsert_is_keyed_on_person_group_and_office(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: officer_upsert_is_keyed_on_person_group_and_office skipped");
        return;
    };
    let group = ctx.seed_group("Chorus");
    let person = ctx.seed_person("pat@example.com");

    let inserted = ctx
        .block_on(
            ctx.officers
                .upsert(officer(person, group, Office::Manager, Status::Active)),
        )
        .expect("insert officer");
    let mut closing = officer(person, group, Office::Manager, Status::Inactive);
    closing.end_date = Some(date(2024, 1, 31));
    let updated = ctx
        .block_on(ctx.officers.upsert(closing))
        .expect("update officer");
    let librarian = ctx
        .block_on(
            ctx.officers
                .upsert(officer(person, group, Office::Librarian, Status::Active)),
        )
        .expect("second office");

    assert!(inserted.created);
    assert!(!updated.created);
    assert_eq!(updated.value.id, inserted.value.id);
    assert_eq!(updated.value.status, Status::Inactive);
    assert_eq!(updated.value.end_date, Some(date(2024, 1, 31)));
    assert!(librarian.created);
    assert_ne!(librarian.value.id, inserted.value.id);
}

#[rstest]
fn member_upsert_is_keyed_on_group_and_person(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: member_upsert_is_keyed_on_group_and_person skipped");
        return;
    };
    let group = ctx.seed_group("Quartet");
    let person = ctx.seed_person("");
    let key = MemberKey {
        group_id: group,
        person_id: person,
    };
    let member = |part, status| MemberUpsert {
        key,
        status,
        part,
        start_date: Some(date(2020, 1, 1)),
        end_date: None,
    };

    let inserted = ctx
        .block_on(ctx.members.upsert(member(Some(VoicePart::Lead), Status::Active)))
        .expect("insert member");
    let updated = ctx
        .block_on(ctx.members.upsert(member(Some(VoicePart::Bass), Status::Inactive)))
        .expect("update member");

    assert!(inserted.created);
    assert!(!updated.created);
    assert_eq!(updated.value.id, inserted.value.id);
    assert_eq!(updated.value.part, Some(VoicePart::Bass));
    assert_eq!(updated.value.status, Status::Inactive);

    let deleted = ctx
        .block_on(ctx.members.delete_orphans(&[key]))
        .expect("keep live member");
    assert_eq!(deleted, 0);
}

#[rstest]
fn group_owners_follow_active_officers_with_accounts(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: group_owners_follow_active_officers_with_accounts skipped");
        return;
    };
    let group = ctx.seed_group("Chorus");
    let alto = ctx.seed_person("alto@example.com");
    let bass = ctx.seed_person("bass@example.com");
    let no_account = ctx.seed_person("nobody@example.com");
    let no_email = ctx.seed_person("");
    let alto_account = ctx.seed_account("alto@example.com");
    let bass_account = ctx.seed_account("bass@example.com");
    for person in [alto, bass, no_account, no_email] {
        ctx.block_on(
            ctx.officers
                .upsert(officer(person, group, Office::Manager, Status::Active)),
        )
        .expect("seed officer");
    }

    let mut expected = vec![alto_account, bass_account];
    expected.sort();
    let owners = ctx
        .block_on(ctx.owners.recompute_group_owners(group))
        .expect("recompute");
    assert_eq!(owners, expected);

    ctx.block_on(
        ctx.officers
            .upsert(officer(bass, group, Office::Manager, Status::Inactive)),
    )
    .expect("bass steps down");
    let owners = ctx
        .block_on(ctx.owners.recompute_group_owners(group))
        .expect("recompute");
    assert_eq!(owners, vec![alto_account]);
    let stored = ctx
        .block_on(ctx.owners.group_owners(group))
        .expect("read owners");
    assert_eq!(stored, vec![alto_account]);
}

#[rstest]
fn person_owners_match_the_account_email(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: person_owners_match_the_account_email skipped");
        return;
    };
    let with_account = ctx.seed_person("pat@example.com");
    let without_email = ctx.seed_person("");
    let account = ctx.seed_account("pat@example.com");

    let owners = ctx
        .block_on(ctx.owners.recompute_person_owners(with_account))
        .expect("recompute");
    let none = ctx
        .block_on(ctx.owners.recompute_person_owners(without_email))
        .expect("recompute");
    let missing = ctx
        .block_on(ctx.owners.recompute_person_owners(Uuid::new_v4()))
        .expect("recompute unknown person");

    assert_eq!(owners, vec![account]);
    assert!(none.is_empty());
    assert!(missing.is_empty());
    let stored = ctx
        .block_on(ctx.owners.person_owners(with_account))
        .expect("read owners");
    assert_eq!(stored, vec![account]);
}

#[rstest]
fn concurrent_recomputes_keep_every_officer(roster_db: Option<TestContext>) {
    let Some(ctx) = roster_db else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_recomputes_keep_every_officer skipped");
        return;
    };
    let group = ctx.seed_group("Chorus");
    let mut expected = Vec::new();
    let mut persons = Vec::new();
    for n in 0..12 {
        let email = format!("singer{n}@example.com");
        persons.push(ctx.seed_person(&email));
        expected.push(ctx.seed_account(&email));
    }
    expected.sort();

    let owners = ctx.block_on(async {
        let tasks: Vec<_> = persons
            .into_iter()
            .map(|person| {
                let officers = ctx.officers.clone();
                let owners = Arc::clone(&ctx.owners);
                tokio::spawn(async move {
                    officers
                        .upsert(officer(person, group, Office::Manager, Status::Active))
                        .await
                        .expect("officer upsert");
                    owners
                        .recompute_group_owners(group)
                        .await
                        .expect("recompute");
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("task joins");
        }
        ctx.owners.group_owners(group).await.expect("read owners")
    });

    assert_eq!(owners, expected);
}
