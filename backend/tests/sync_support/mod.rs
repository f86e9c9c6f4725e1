//! Shared fixtures for in-memory sync pass tests.

use std::fs;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, MockClock};
use roster_backend::app::RosterApp;
use roster_backend::config::SyncSettings;
use roster_backend::outbound::RosterStores;
use roster_backend::outbound::memory::InMemoryRoster;
use roster_backend::outbound::queue::QueueRuntime;
use roster_backend::outbound::source::JsonSnapshotSource;
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

/// Status token the legacy system uses for active structures.
pub const ACTIVE_STATUS: &str = "7b9e5e34-a7c5-4f1e-9fc5-656caa74b3c7";

pub const ORGANIZATION: u128 = 1;
pub const DISTRICT: u128 = 2;
pub const CHAPTER: u128 = 3;
pub const QUARTET: u128 = 4;
pub const SINGERS: [u128; 4] = [10, 11, 12, 13];

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now());
    clock.expect_local().returning(|| now().with_timezone(&Local));
    Arc::new(clock)
}

/// Raw legacy tables, written to a temporary directory on demand.
pub struct Snapshot {
    pub structures: Vec<Value>,
    pub humans: Vec<Value>,
    pub subscriptions: Vec<Value>,
    pub roles: Vec<Value>,
    pub memberships: Vec<Value>,
    pub joins: Vec<Value>,
}

const MODIFIED: &str = "2024-01-15T09:00:00Z";

fn structure(n: u128, name: &str, kind: &str, bhs_id: i32, parent: Option<u128>) -> Value {
    json!({
        "id": id(n),
        "name": name,
        "kind": kind,
        "bhs_id": bhs_id,
        "status_id": ACTIVE_STATUS,
        "parent_id": parent.map(id),
        "chapter_code": if kind == "district" { "FWD" } else { "" },
        "modified": MODIFIED,
    })
}

fn human(n: u128, first: &str, last: &str, birth: &str) -> Value {
    json!({
        "id": id(n),
        "first_name": first,
        "last_name": last,
        "email": format!("{}@example.com", first.to_ascii_lowercase()),
        "birth_date": birth,
        "modified": MODIFIED,
    })
}

fn subscription(human: u128) -> Value {
    json!({
        "id": id(human + 100),
        "human_id": id(human),
        "items_editable": true,
        "current_through": "2024-12-31",
        "modified": MODIFIED,
    })
}

fn join(n: u128, structure: u128, human: u128, part: &str) -> Value {
    json!({
        "id": id(n),
        "structure_id": id(structure),
        "membership_id": id(900),
        "subscription_id": id(human + 100),
        "paid": true,
        "part": part,
        "established_date": "2015-03-01",
        "modified": MODIFIED,
    })
}

impl Snapshot {
    /// International root, one district with a chapter and a senior quartet
    /// whose manager is also a national member.
    pub fn harmony() -> Self {
        let singers = [
            (SINGERS[0], "Pat", "Singer", "1950-02-01", "tenor"),
            (SINGERS[1], "Sam", "Adams", "1955-03-01", "lead"),
            (SINGERS[2], "Lee", "Baker", "1948-04-01", "baritone"),
            (SINGERS[3], "Alex", "Adams", "1960-05-01", "bass"),
        ];
        Self {
            structures: vec![
                structure(QUARTET, "Four Voices", "quartet", 400, Some(DISTRICT)),
                structure(CHAPTER, "Harmonizers, The", "chapter", 300, Some(DISTRICT)),
                structure(DISTRICT, "Far Western District", "district", 200, Some(ORGANIZATION)),
                structure(ORGANIZATION, "Barbershop Harmony Society", "organization", 1, None),
            ],
            humans: singers
                .iter()
                .map(|(n, first, last, birth, _)| human(*n, first, last, birth))
                .collect(),
            subscriptions: singers.iter().map(|(n, ..)| subscription(*n)).collect(),
            roles: vec![json!({
                "id": id(700),
                "name": "Manager",
                "human_id": id(SINGERS[0]),
                "structure_id": id(QUARTET),
                "start_date": "2016-01-01",
                "modified": MODIFIED,
            })],
            memberships: vec![json!({"id": id(900), "modified": MODIFIED})],
            joins: singers
                .iter()
                .map(|(n, _, _, _, part)| join(n + 500, QUARTET, *n, part))
                .chain(std::iter::once(join(600, ORGANIZATION, SINGERS[0], "")))
                .collect(),
        }
    }

    /// Drop a human along with everything that references them.
    pub fn without_human(mut self, n: u128) -> Self {
        let human_id = json!(id(n));
        let subscription_id = json!(id(n + 100));
        self.humans.retain(|row| row["id"] != human_id);
        self.subscriptions.retain(|row| row["human_id"] != human_id);
        self.roles.retain(|row| row["human_id"] != human_id);
        self.joins.retain(|row| row["subscription_id"] != subscription_id);
        self
    }

    pub fn write_to(&self, dir: &TempDir) {
        let tables = [
            ("structures.json", &self.structures),
            ("humans.json", &self.humans),
            ("subscriptions.json", &self.subscriptions),
            ("roles.json", &self.roles),
            ("memberships.json", &self.memberships),
            ("joins.json", &self.joins),
        ];
        for (name, rows) in tables {
            let text = serde_json::to_string(rows).expect("encode table");
            fs::write(dir.path().join(name), text).expect("write table");
        }
    }
}

/// An assembled app over a fresh in-memory store and a snapshot directory.
pub struct World {
    pub dump: TempDir,
    pub roster: Arc<InMemoryRoster>,
    pub app: RosterApp,
}

impl World {
    pub fn new(snapshot: &Snapshot) -> Self {
        let dump = tempfile::tempdir().expect("temp dir");
        snapshot.write_to(&dump);
        let roster = Arc::new(InMemoryRoster::new());
        let settings = SyncSettings {
            workers: Some(3),
            max_attempts: Some(3),
            retry_base_delay_ms: Some(1),
            ..SyncSettings::default()
        };
        let source = Arc::new(JsonSnapshotSource::new(dump.path(), clock()));
        let app = RosterApp::assemble(
            &RosterStores::in_memory(&roster),
            source,
            &settings,
            QueueRuntime::default(),
            clock(),
        );
        Self { dump, roster, app }
    }
}
