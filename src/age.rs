//! # Age Normalization
//!
//! Converts ages in days into integer month buckets, the key space of the
//! reference table. Every call site in the crate buckets with the same rule
//! (round half away from zero), so a measurement's percentile month and its
//! chart month are always the same bucket.

use chrono::NaiveDate;

/// Average Gregorian month length in days (365.25 / 12)
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.4375;

/// Month bucket for an age in days.
///
/// Negative ages are not rejected here; callers validate dates upstream.
pub fn months_from_days(age_in_days: i64) -> i64 {
    (age_in_days as f64 / AVERAGE_DAYS_PER_MONTH).round() as i64
}

/// Whole days between birth and the measurement date
pub fn age_in_days(birth_date: NaiveDate, date: NaiveDate) -> i64 {
    (date - birth_date).num_days()
}
