//! # Growth Reference Table
//!
//! Pre-tabulated WHO weight-for-age percentiles, 0 to 24 months, per gender.
//!
//! The asset on disk is JSON with string keys:
//! ```text
//! { "boys":  { "0": { "3": 2.5, "50": 3.3, ... }, "1": { ... } },
//!   "girls": { ... } }
//! ```
//! It is parsed once into integer month and percentile-rank keys; nothing
//! outside this module sees the stringly-typed form.

use crate::error::ReferenceError;
use crate::models::Gender;
use std::collections::BTreeMap;

const WHO_WEIGHT_FOR_AGE: &str = include_str!("../data/who_weight_for_age.json");

/// Percentile rank -> reference weight (kg) for one gender and month
pub type ReferenceRow = BTreeMap<u8, f64>;

type RawTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Immutable lookup of reference weights by gender, month and percentile rank
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    rows: BTreeMap<Gender, BTreeMap<u32, ReferenceRow>>,
}

impl ReferenceTable {
    /// The bundled WHO weight-for-age table
    pub fn who_weight_for_age() -> Result<Self, ReferenceError> {
        Self::from_json(WHO_WEIGHT_FOR_AGE)
    }

    /// Parse a table from its JSON asset form
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let raw: RawTable = serde_json::from_str(json).map_err(ReferenceError::Parse)?;
        let mut table = Self::default();

        for (gender_key, months) in raw {
            let gender = match gender_key.as_str() {
                "boys" => Gender::Male,
                "girls" => Gender::Female,
                _ => return Err(ReferenceError::UnknownGender(gender_key)),
            };

            for (month_key, ranks) in months {
                let month: u32 = month_key
                    .trim()
                    .parse()
                    .map_err(|_| ReferenceError::InvalidMonthKey(month_key.clone()))?;

                let mut row = ReferenceRow::new();
                for (rank_key, weight) in ranks {
                    let rank = parse_rank(&rank_key)?;
                    if !weight.is_finite() || weight <= 0.0 {
                        return Err(ReferenceError::InvalidWeight { month, rank });
                    }
                    row.insert(rank, weight);
                }
                table.insert_row(gender, month, row);
            }
        }

        log::debug!(
            "Loaded reference table: {} boys rows, {} girls rows",
            table.month_count(Gender::Male),
            table.month_count(Gender::Female)
        );
        Ok(table)
    }

    /// Add or replace the row for one gender and month
    pub fn insert_row(&mut self, gender: Gender, month: u32, row: ReferenceRow) {
        self.rows.entry(gender).or_default().insert(month, row);
    }

    /// Row for a month bucket; `None` for negative months or gaps
    pub fn row(&self, gender: Gender, month: i64) -> Option<&ReferenceRow> {
        let month = u32::try_from(month).ok()?;
        self.rows.get(&gender)?.get(&month)
    }

    /// Reference weight for one percentile rank
    pub fn weight_at(&self, gender: Gender, month: i64, rank: u8) -> Option<f64> {
        self.row(gender, month)?.get(&rank).copied()
    }

    pub fn month_count(&self, gender: Gender) -> usize {
        self.rows.get(&gender).map_or(0, |months| months.len())
    }

    /// Highest month with data for this gender
    pub fn max_month(&self, gender: Gender) -> Option<u32> {
        self.rows.get(&gender)?.keys().next_back().copied()
    }
}

fn parse_rank(key: &str) -> Result<u8, ReferenceError> {
    match key.trim().parse::<u8>() {
        Ok(rank) if rank <= 100 => Ok(rank),
        _ => Err(ReferenceError::InvalidPercentileKey(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table_covers_two_years() {
        let table = ReferenceTable::who_weight_for_age().expect("Bundled table must parse");
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(table.month_count(gender), 25);
            assert_eq!(table.max_month(gender), Some(24));
            for month in 0..=24 {
                let row = table.row(gender, month).expect("Row missing");
                let weights: Vec<f64> = row.values().copied().collect();
                assert!(weights.windows(2).all(|w| w[0] <= w[1]), "month {} not monotonic", month);
            }
        }
    }

    #[test]
    fn test_bundled_medians_are_plausible() {
        let table = ReferenceTable::who_weight_for_age().unwrap();
        let boys_birth = table.weight_at(Gender::Male, 0, 50).unwrap();
        let girls_year = table.weight_at(Gender::Female, 12, 50).unwrap();
        assert!((boys_birth - 3.35).abs() < 0.1);
        assert!((girls_year - 8.95).abs() < 0.1);
    }

    #[test]
    fn test_out_of_range_months() {
        let table = ReferenceTable::who_weight_for_age().unwrap();
        assert!(table.row(Gender::Male, -1).is_none());
        assert!(table.row(Gender::Male, 25).is_none());
    }

    #[test]
    fn test_parse_small_table() {
        let json = r#"{"boys": {"2": {"3": 4.3, "50": 5.1, "97": 6.3}}}"#;
        let table = ReferenceTable::from_json(json).unwrap();
        assert_eq!(table.weight_at(Gender::Male, 2, 50), Some(5.1));
        assert_eq!(table.month_count(Gender::Female), 0);
    }

    #[test]
    fn test_rejects_bad_keys() {
        let bad_gender = r#"{"kids": {}}"#;
        assert!(matches!(
            ReferenceTable::from_json(bad_gender),
            Err(ReferenceError::UnknownGender(_))
        ));

        let bad_month = r#"{"boys": {"two": {"50": 5.1}}}"#;
        assert!(matches!(
            ReferenceTable::from_json(bad_month),
            Err(ReferenceError::InvalidMonthKey(_))
        ));

        let bad_rank = r#"{"girls": {"2": {"150": 5.1}}}"#;
        assert!(matches!(
            ReferenceTable::from_json(bad_rank),
            Err(ReferenceError::InvalidPercentileKey(_))
        ));

        let bad_weight = r#"{"girls": {"2": {"50": -1.0}}}"#;
        assert!(matches!(
            ReferenceTable::from_json(bad_weight),
            Err(ReferenceError::InvalidWeight { month: 2, rank: 50 })
        ));
    }
}
