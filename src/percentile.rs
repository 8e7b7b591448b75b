//! # Percentile Estimation
//!
//! Places a reading on the reference distribution by linear interpolation
//! between the two tabulated percentiles that bracket it.
//!
//! ## Rules
//! - Missing row: `None` ("cannot estimate"), never an error
//! - Below the lowest / above the highest reference weight: clamp to that rank
//! - Zero-width bracket (tied weights): the lower bracket's rank
//!
//! Results are not rounded; round only for display.

use crate::models::Gender;
use crate::reference::{ReferenceRow, ReferenceTable};

/// Linear interpolation of `y` at `x` between (x1, y1) and (x2, y2)
fn interpolate(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x2 == x1 {
        return y1;
    }
    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Estimate the percentile rank of `value` within one reference row.
///
/// The row is re-sorted by reference value, so it does not need to arrive
/// ordered. Works for any metric tabulated as rank -> value.
pub fn estimate_percentile(row: &ReferenceRow, value: f64) -> Option<f64> {
    let mut entries: Vec<(f64, f64)> = row
        .iter()
        .map(|(&rank, &reference)| (f64::from(rank), reference))
        .collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));

    let (lowest_rank, lowest) = *entries.first()?;
    let (highest_rank, highest) = *entries.last()?;

    if value <= lowest {
        return Some(lowest_rank);
    }
    if value >= highest {
        return Some(highest_rank);
    }

    entries
        .windows(2)
        .find(|pair| pair[0].1 <= value && value <= pair[1].1)
        .map(|pair| {
            let (curr_rank, curr) = pair[0];
            let (next_rank, next) = pair[1];
            interpolate(value, curr, curr_rank, next, next_rank)
        })
}

/// Estimated weight-for-age percentile, or `None` when the table has no row
/// for this gender and month
pub fn estimate_weight_percentile(
    table: &ReferenceTable,
    age_in_months: i64,
    weight_kg: f64,
    gender: Gender,
) -> Option<f64> {
    let Some(row) = table.row(gender, age_in_months) else {
        log::trace!("No {} reference row for month {}", gender, age_in_months);
        return None;
    };
    estimate_percentile(row, weight_kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month_two_table() -> ReferenceTable {
        let mut table = ReferenceTable::default();
        table.insert_row(
            Gender::Male,
            2,
            ReferenceRow::from([(3, 4.3), (50, 5.1), (97, 6.3)]),
        );
        table
    }

    #[test]
    fn test_exact_reference_weights() {
        let table = month_two_table();
        assert_eq!(estimate_weight_percentile(&table, 2, 5.1, Gender::Male), Some(50.0));
        assert_eq!(estimate_weight_percentile(&table, 2, 4.3, Gender::Male), Some(3.0));
        assert_eq!(estimate_weight_percentile(&table, 2, 6.3, Gender::Male), Some(97.0));
    }

    #[test]
    fn test_clamps_outside_range() {
        let table = month_two_table();
        assert_eq!(estimate_weight_percentile(&table, 2, 3.0, Gender::Male), Some(3.0));
        assert_eq!(estimate_weight_percentile(&table, 2, 9.0, Gender::Male), Some(97.0));
    }

    #[test]
    fn test_interpolates_between_brackets() {
        let table = month_two_table();
        let p = estimate_weight_percentile(&table, 2, 5.7, Gender::Male).unwrap();
        // halfway between 5.1 and 6.3
        assert!((p - 73.5).abs() < 1e-9);
        assert!(p > 50.0 && p < 97.0);
    }

    #[test]
    fn test_missing_row_is_none() {
        let table = month_two_table();
        assert_eq!(estimate_weight_percentile(&table, 3, 5.1, Gender::Male), None);
        assert_eq!(estimate_weight_percentile(&table, 2, 5.1, Gender::Female), None);
        assert_eq!(estimate_weight_percentile(&table, -1, 5.1, Gender::Male), None);
    }

    #[test]
    fn test_single_entry_row() {
        let row = ReferenceRow::from([(50, 5.0)]);
        assert_eq!(estimate_percentile(&row, 4.0), Some(50.0));
        assert_eq!(estimate_percentile(&row, 6.0), Some(50.0));
    }

    #[test]
    fn test_empty_row() {
        assert_eq!(estimate_percentile(&ReferenceRow::new(), 4.0), None);
    }

    #[test]
    fn test_rank_order_not_assumed() {
        // ranks and weights deliberately disagree in key order
        let row = ReferenceRow::from([(10, 6.0), (90, 4.0)]);
        assert_eq!(estimate_percentile(&row, 5.0), Some(50.0));
    }

    #[test]
    fn test_tied_weights_use_lower_bound() {
        assert_eq!(interpolate(5.0, 5.0, 25.0, 5.0, 50.0), 25.0);
        let row = ReferenceRow::from([(3, 4.0), (25, 5.0), (50, 5.0), (97, 6.0)]);
        let p = estimate_percentile(&row, 5.0).unwrap();
        assert!(p == 25.0 || p == 50.0);
    }

    #[test]
    fn test_monotonic_in_weight() {
        let table = ReferenceTable::who_weight_for_age().unwrap();
        for gender in [Gender::Male, Gender::Female] {
            for month in 0..=24 {
                let mut last = f64::MIN;
                for step in 0..=200 {
                    let weight = 1.5 + step as f64 * 0.07;
                    let p = estimate_weight_percentile(&table, month, weight, gender).unwrap();
                    assert!(p >= last, "{} month {} weight {}", gender, month, weight);
                    last = p;
                }
            }
        }
    }
}
