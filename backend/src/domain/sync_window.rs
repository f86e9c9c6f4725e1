//! Cursor windows for incremental sync passes.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How far back a sync pass looks.
///
/// Each incremental window subtracts a safety overlap so rows modified while
/// the previous pass ran are not missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncWindow {
    /// Every row; orphan deletion runs afterwards.
    Full,
    /// Rows changed in the last `n` days, with a one-hour overlap.
    Days(u32),
    /// Rows changed in the last `n` hours, with a five-minute overlap.
    Hours(u32),
    /// Rows changed in the last `n` minutes, with a five-second overlap.
    Minutes(u32),
}

impl SyncWindow {
    /// Cursor timestamp for this window, or `None` for a full export.
    ///
    /// Windows reaching past the earliest representable instant clamp to it,
    /// which selects every row.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use roster_backend::domain::SyncWindow;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid");
    /// let cursor = SyncWindow::Hours(1).cursor(now).expect("incremental");
    /// assert_eq!(cursor, Utc.with_ymd_and_hms(2024, 6, 1, 10, 55, 0).single().expect("valid"));
    /// assert!(SyncWindow::Full.cursor(now).is_none());
    /// ```
    pub fn cursor(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let (span, overlap) = match self {
            Self::Full => return None,
            Self::Days(days) => (TimeDelta::try_days(i64::from(days)), TimeDelta::hours(1)),
            Self::Hours(hours) => (TimeDelta::try_hours(i64::from(hours)), TimeDelta::minutes(5)),
            Self::Minutes(minutes) => (
                TimeDelta::try_minutes(i64::from(minutes)),
                TimeDelta::seconds(5),
            ),
        };
        let cursor = span
            .and_then(|span| span.checked_add(&overlap))
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Some(cursor)
    }

    /// Whether this pass sees every source row.
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}
