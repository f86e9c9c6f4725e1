//! Senior quartet eligibility.

use chrono::NaiveDate;

/// Maximum number of active singers for a senior quartet.
pub const MAX_SENIOR_SINGERS: usize = 4;
/// Minimum age of every singer.
pub const MIN_SENIOR_AGE: i64 = 55;
/// Minimum combined age.
pub const MIN_SENIOR_TOTAL_AGE: i64 = 240;

/// Age in whole 365-day years on `reference`.
pub fn age_in_years(birth_date: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - birth_date).num_days() / 365
}

/// Whether singers with these birth dates form a senior quartet on
/// `reference`.
///
/// More than four singers, or any missing birth date, disqualifies the
/// group. Otherwise every singer must be at least 55 and the ages must sum
/// to at least 240.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use roster_backend::domain::is_senior_quartet;
///
/// let born = NaiveDate::from_ymd_opt(1955, 1, 1);
/// let reference = NaiveDate::from_ymd_opt(2020, 1, 11).expect("valid");
/// assert!(is_senior_quartet(&[born, born, born, born], reference));
/// assert!(!is_senior_quartet(&[born, born, born, None], reference));
/// ```
pub fn is_senior_quartet(birth_dates: &[Option<NaiveDate>], reference: NaiveDate) -> bool {
    if birth_dates.len() > MAX_SENIOR_SINGERS {
        return false;
    }
    let mut total = 0;
    let mut all_old_enough = true;
    for birth_date in birth_dates {
        let Some(birth_date) = birth_date else {
            return false;
        };
        let age = age_in_years(*birth_date, reference);
        all_old_enough &= age >= MIN_SENIOR_AGE;
        total += age;
    }
    all_old_enough && total >= MIN_SENIOR_TOTAL_AGE
}
