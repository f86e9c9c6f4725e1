//! Source export adapter over a directory of legacy JSON table dumps.
//!
//! The directory holds one JSON array per legacy table
//! (`structures.json`, `humans.json`, `subscriptions.json`, `roles.json`,
//! `memberships.json`, `joins.json`). A missing file reads as an empty
//! table. The parsed tables are cached until the next `refresh`, so one pass
//! reads the directory once and every export sees the same dump.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{SourceExport, SourceExportError};
use crate::domain::{HumanRecord, JoinRecord, LegacySnapshot, RoleRecord, StructureRecord};

/// Reads [`LegacySnapshot`]s from a dump directory.
#[derive(Clone)]
pub struct JsonSnapshotSource {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    cached: Arc<Mutex<Option<Arc<LegacySnapshot>>>>,
}

impl JsonSnapshotSource {
    /// Source over `dir`; "today" for status derivation comes from `clock`.
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Cached tables, loading them on first use.
    async fn snapshot(&self) -> Result<Arc<LegacySnapshot>, SourceExportError> {
        let mut cached = self.cached.lock().await;
        if let Some(snapshot) = cached.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(self.load().await?);
        *cached = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Load every table from the directory.
    ///
    /// # Errors
    ///
    /// [`SourceExportError::Unavailable`] when the directory or a file cannot
    /// be read; [`SourceExportError::Malformed`] when a file is not a JSON
    /// array of the expected rows.
    pub async fn load(&self) -> Result<LegacySnapshot, SourceExportError> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || load_snapshot(&dir))
            .await
            .map_err(|err| SourceExportError::unavailable(format!("snapshot load task: {err}")))?
    }
}

fn load_snapshot(path: &Path) -> Result<LegacySnapshot, SourceExportError> {
    let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| {
        SourceExportError::unavailable(format!("open snapshot directory '{}': {err}", path.display()))
    })?;
    let snapshot = LegacySnapshot {
        structures: read_table(&dir, "structures.json")?,
        humans: read_table(&dir, "humans.json")?,
        subscriptions: read_table(&dir, "subscriptions.json")?,
        roles: read_table(&dir, "roles.json")?,
        memberships: read_table(&dir, "memberships.json")?,
        joins: read_table(&dir, "joins.json")?,
    };
    debug!(
        structures = snapshot.structures.len(),
        humans = snapshot.humans.len(),
        subscriptions = snapshot.subscriptions.len(),
        roles = snapshot.roles.len(),
        memberships = snapshot.memberships.len(),
        joins = snapshot.joins.len(),
        "loaded legacy snapshot"
    );
    Ok(snapshot)
}

fn read_table<T: DeserializeOwned>(dir: &Dir, name: &str) -> Result<Vec<T>, SourceExportError> {
    let mut file = match dir.open(name) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(SourceExportError::unavailable(format!("open {name}: {err}")));
        }
    };
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|err| SourceExportError::unavailable(format!("read {name}: {err}")))?;
    serde_json::from_str(&text)
        .map_err(|err| SourceExportError::malformed(format!("parse {name}: {err}")))
}

#[async_trait]
impl SourceExport for JsonSnapshotSource {
    async fn refresh(&self) -> Result<(), SourceExportError> {
        let snapshot = self.load().await?;
        *self.cached.lock().await = Some(Arc::new(snapshot));
        Ok(())
    }

    async fn export_structures(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<StructureRecord>, SourceExportError> {
        Ok(self.snapshot().await?.export_structures(cursor))
    }

    async fn export_humans(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<HumanRecord>, SourceExportError> {
        let today = self.clock.utc().date_naive();
        Ok(self.snapshot().await?.export_humans(cursor, today))
    }

    async fn export_roles(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<RoleRecord>, SourceExportError> {
        let today = self.clock.utc().date_naive();
        Ok(self.snapshot().await?.export_roles(cursor, today))
    }

    async fn export_joins(
        &self,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Vec<JoinRecord>, SourceExportError> {
        let today = self.clock.utc().date_naive();
        Ok(self.snapshot().await?.export_joins(cursor, today))
    }
}
