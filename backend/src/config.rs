//! Sync settings loaded via OrthoConfig.
//!
//! Values come from `ROSTER_SYNC_*` environment variables and an optional
//! config file; the binary layers its own flags on top.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::queue::RetryPolicy;

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250;
const DEFAULT_SOURCE_DIR: &str = "snapshot";

/// Midwinter convention date used for senior quartet ages.
pub fn default_senior_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 11).unwrap_or_default()
}

/// Configuration for sync passes and operator commands.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER_SYNC")]
pub struct SyncSettings {
    /// PostgreSQL connection string; `DATABASE_URL` is the fallback.
    pub database_url: Option<String>,
    /// Directory holding the legacy JSON table dumps.
    pub source_dir: Option<PathBuf>,
    /// Concurrent reconcile workers.
    pub workers: Option<usize>,
    /// Attempts per reconcile job, including the first.
    pub max_attempts: Option<u32>,
    /// Base retry delay in milliseconds.
    pub retry_base_delay_ms: Option<u64>,
    /// Reference date for senior quartet ages.
    pub senior_reference_date: Option<NaiveDate>,
    /// Reconcile into an in-memory store instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub dry_run: bool,
}

impl SyncSettings {
    /// Configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Snapshot directory, defaulting to `./snapshot`.
    pub fn source_dir(&self) -> PathBuf {
        self.source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR))
    }

    /// Worker count; never less than one.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS).max(1)
    }

    /// Queue retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
            base_delay: Duration::from_millis(
                self.retry_base_delay_ms
                    .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
            ),
        }
    }

    /// Reference date for senior quartet ages.
    pub fn senior_reference_date(&self) -> NaiveDate {
        self.senior_reference_date
            .unwrap_or_else(default_senior_reference_date)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for sync settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "ROSTER_SYNC_DATABASE_URL",
        "ROSTER_SYNC_SOURCE_DIR",
        "ROSTER_SYNC_WORKERS",
        "ROSTER_SYNC_MAX_ATTEMPTS",
        "ROSTER_SYNC_RETRY_BASE_DELAY_MS",
        "ROSTER_SYNC_SENIOR_REFERENCE_DATE",
        "ROSTER_SYNC_DRY_RUN",
        "DATABASE_URL",
    ];

    fn load_from_empty_args() -> SyncSettings {
        SyncSettings::load_from_iter([OsString::from("roster-sync")]).expect("config should load")
    }

    fn cleared_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared_with(&[]));

        let settings = load_from_empty_args();

        assert!(!settings.dry_run);
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.source_dir(), PathBuf::from("snapshot"));
        assert_eq!(settings.workers(), 4);
        assert_eq!(
            settings.retry_policy(),
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(250),
            }
        );
        assert_eq!(
            settings.senior_reference_date(),
            NaiveDate::from_ymd_opt(2020, 1, 11).expect("date")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_with(&[
            ("ROSTER_SYNC_DATABASE_URL", "postgres://localhost/roster"),
            ("ROSTER_SYNC_SOURCE_DIR", "/srv/dumps"),
            ("ROSTER_SYNC_WORKERS", "8"),
            ("ROSTER_SYNC_MAX_ATTEMPTS", "5"),
            ("ROSTER_SYNC_RETRY_BASE_DELAY_MS", "50"),
            ("ROSTER_SYNC_SENIOR_REFERENCE_DATE", "2024-01-13"),
            ("ROSTER_SYNC_DRY_RUN", "true"),
        ]));

        let settings = load_from_empty_args();

        assert!(settings.dry_run);
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://localhost/roster")
        );
        assert_eq!(settings.source_dir(), PathBuf::from("/srv/dumps"));
        assert_eq!(settings.workers(), 8);
        assert_eq!(settings.retry_policy().max_attempts, 5);
        assert_eq!(
            settings.retry_policy().base_delay,
            Duration::from_millis(50)
        );
        assert_eq!(
            settings.senior_reference_date(),
            NaiveDate::from_ymd_opt(2024, 1, 13).expect("date")
        );
    }

    #[rstest]
    fn database_url_falls_back_to_the_standard_variable() {
        let _guard = lock_env(cleared_with(&[("DATABASE_URL", "postgres://fallback/db")]));

        let settings = load_from_empty_args();

        assert_eq!(settings.database_url().as_deref(), Some("postgres://fallback/db"));
    }

    #[rstest]
    fn zero_workers_still_runs_one() {
        let settings = SyncSettings {
            workers: Some(0),
            ..SyncSettings::default()
        };
        assert_eq!(settings.workers(), 1);
    }
}
