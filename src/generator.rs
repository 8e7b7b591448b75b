//! # Demo Data Generator
//!
//! Produces synthetic measurements for exercising the percentile and chart
//! pipeline. Values are uniform within plausible ranges and are NOT
//! correlated with age; this is not a growth model.

use crate::age::months_from_days;
use crate::models::{Measurement, Profile};
use crate::percentile::estimate_weight_percentile;
use crate::reference::ReferenceTable;
use chrono::{Duration, Months, NaiveDate};
use rand::Rng;

const WEIGHT_RANGE_KG: (f64, f64) = (3.0, 8.0);
const HEIGHT_RANGE_CM: (f64, f64) = (45.0, 70.0);
const HEAD_RANGE_CM: (f64, f64) = (32.0, 37.0);

/// Months after birth covered by the reference charts
pub const TRACKED_MONTHS: u32 = 24;

/// Two years after birth; Feb 29 births end on Feb 28
pub fn tracking_limit(birth_date: NaiveDate) -> NaiveDate {
    birth_date
        .checked_add_months(Months::new(TRACKED_MONTHS))
        .unwrap_or(birth_date + Duration::days(730))
}

/// Last date a measurement can be recorded for: the tracking limit, or
/// today if that is earlier
pub fn tracking_end(birth_date: NaiveDate, today: NaiveDate) -> NaiveDate {
    tracking_limit(birth_date).min(today)
}

fn sample(rng: &mut (impl Rng + ?Sized), (low, high): (f64, f64), decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let value = low + rng.gen::<f64>() * (high - low);
    (value * scale).round() / scale
}

/// Generate `count` measurements dated between the birth date and
/// `tracking_end(birth, today)`, each with its weight percentile filled in.
///
/// Dates may repeat; merging into a store collapses same-date entries.
pub fn generate_batch(
    profile: &Profile,
    count: usize,
    table: &ReferenceTable,
    today: NaiveDate,
    rng: &mut (impl Rng + ?Sized),
) -> Vec<Measurement> {
    let end = tracking_end(profile.birth_date, today);
    let span_days = (end - profile.birth_date).num_days().max(0);

    let batch: Vec<Measurement> = (0..count)
        .map(|_| {
            let age_in_days = rng.gen_range(0..=span_days);
            let weight_kg = sample(rng, WEIGHT_RANGE_KG, 2);
            let height_cm = sample(rng, HEIGHT_RANGE_CM, 1);
            let head_cm = sample(rng, HEAD_RANGE_CM, 1);

            Measurement {
                id: uuid::Uuid::new_v4().to_string(),
                date: profile.birth_date + Duration::days(age_in_days),
                age_in_days,
                weight_kg,
                height_cm,
                head_cm,
                weight_percentile: estimate_weight_percentile(
                    table,
                    months_from_days(age_in_days),
                    weight_kg,
                    profile.gender,
                ),
            }
        })
        .collect();

    log::debug!(
        "Generated {} demo measurements between {} and {}",
        batch.len(),
        profile.birth_date,
        end
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile(birth_date: NaiveDate) -> Profile {
        Profile {
            id: "p1".to_string(),
            name: "Test".to_string(),
            birth_date,
            gender: Gender::Male,
        }
    }

    #[test]
    fn test_tracking_end() {
        let birth = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let far_future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(
            tracking_end(birth, far_future),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        let soon = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(tracking_end(birth, soon), soon);
    }

    #[test]
    fn test_batch_within_one_year_old_range() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let birth = today - Duration::days(365);
        let table = ReferenceTable::who_weight_for_age().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let batch = generate_batch(&profile(birth), 50, &table, today, &mut rng);
        assert_eq!(batch.len(), 50);
        for m in &batch {
            assert!(m.date >= birth && m.date <= birth + Duration::days(365));
            assert!(m.age_in_days >= 0 && m.age_in_days <= 365);
            assert_eq!(m.date, birth + Duration::days(m.age_in_days));
            assert!((3.0..=8.0).contains(&m.weight_kg));
            assert!((45.0..=70.0).contains(&m.height_cm));
            assert!((32.0..=37.0).contains(&m.head_cm));
            // every month up to 12 has a row, so every point gets a percentile
            let p = m.weight_percentile.expect("percentile should be set");
            assert!((0.0..=100.0).contains(&p));
        }
    }

    #[test]
    fn test_newborn_batch_is_dated_on_birth() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let table = ReferenceTable::default();
        let mut rng = StdRng::seed_from_u64(1);
        let batch = generate_batch(&profile(today), 5, &table, today, &mut rng);
        assert!(batch.iter().all(|m| m.date == today && m.age_in_days == 0));
        assert!(batch.iter().all(|m| m.weight_percentile.is_none()));
    }

    #[test]
    fn test_ids_are_unique() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let table = ReferenceTable::default();
        let mut rng = StdRng::seed_from_u64(3);
        let batch = generate_batch(&profile(today - Duration::days(100)), 20, &table, today, &mut rng);
        let mut ids: Vec<&str> = batch.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
