//! CSV rendering for operator reports.
//!
//! Header rows are written even when a report has no rows, so an empty
//! roster still opens as a labelled sheet.

use std::io;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{QuartetRow, RosterRow};

/// Failure while rendering a report.
#[derive(Debug, Error)]
pub enum ReportWriteError {
    /// A row could not be encoded.
    #[error("encode report row: {0}")]
    Csv(#[from] csv::Error),
    /// The destination rejected a write.
    #[error("write report: {0}")]
    Io(#[from] io::Error),
}

/// Report row with a fixed column order.
pub trait CsvReport: Serialize {
    /// Column labels, matching the serialised field order.
    const HEADERS: &'static [&'static str];
}

impl CsvReport for RosterRow {
    const HEADERS: &'static [&'static str] =
        &["BHS ID", "First Name", "Last Name", "Expiration Date", "Status"];
}

impl CsvReport for QuartetRow {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Name", "Kind", "District", "Chapters", "Senior?", "Youth?", "BHS ID", "Code",
        "Status",
    ];
}

/// Write `rows` as CSV to `out`, header first.
///
/// # Errors
///
/// Returns [`ReportWriteError`] when a row cannot be encoded or `out`
/// rejects a write.
pub fn write_csv<R, W>(rows: &[R], out: W) -> Result<(), ReportWriteError>
where
    R: CsvReport,
    W: io::Write,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(rows = rows.len(), "wrote csv report");
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Header and row layout of rendered reports.

    use chrono::NaiveDate;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn render<R: CsvReport>(rows: &[R]) -> String {
        let mut out = Vec::new();
        write_csv(rows, &mut out).expect("render");
        String::from_utf8(out).expect("utf-8")
    }

    #[rstest]
    fn empty_roster_still_has_headers() {
        let text = render::<RosterRow>(&[]);
        assert_eq!(text, "BHS ID,First Name,Last Name,Expiration Date,Status\n");
    }

    #[rstest]
    fn roster_rows_follow_the_header() {
        let rows = [
            RosterRow {
                bhs_id: Some(101),
                first_name: "Pat".to_owned(),
                last_name: "Singer".to_owned(),
                expiration: NaiveDate::from_ymd_opt(2024, 12, 31),
                status: "Active",
            },
            RosterRow {
                bhs_id: None,
                first_name: "Sam".to_owned(),
                last_name: "Tenor, Jr.".to_owned(),
                expiration: None,
                status: "Inactive",
            },
        ];

        let text = render(&rows);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "101,Pat,Singer,2024-12-31,Active");
        assert_eq!(lines[2], ",Sam,\"Tenor, Jr.\",,Inactive");
    }

    #[rstest]
    fn quartet_columns_match_headers() {
        let row = QuartetRow {
            id: Uuid::from_u128(1),
            name: "Four Voices".to_owned(),
            kind: "Quartet",
            district: "FWD",
            chapters: String::new(),
            is_senior: true,
            is_youth: false,
            bhs_id: Some(42),
            code: String::new(),
            status: "Active",
        };

        let text = render(&[row]);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(headers.len(), QuartetRow::HEADERS.len());
        let record = reader.records().next().expect("row").expect("parse");
        assert_eq!(&record[1], "Four Voices");
        assert_eq!(&record[5], "true");
    }
}
