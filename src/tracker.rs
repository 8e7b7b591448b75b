//! # Growth Tracker Service
//!
//! Composition root tying the repositories to the pure percentile and series
//! functions. This is the only layer that validates user input; the core
//! functions below it stay permissive.
//!
//! ## Responsibilities
//! 1. Keep `age_in_days` and `weight_percentile` in step with the profile
//! 2. Enforce date/value rules before anything is persisted
//! 3. Cascade profile deletion to measurements
//! 4. Assemble chart data from a fresh snapshot of the stores

use crate::age::{age_in_days, months_from_days};
use crate::error::{StoreError, TrackerError, ValidationError};
use crate::generator::{generate_batch, tracking_limit};
use crate::models::{Gender, Measurement, Profile};
use crate::percentile::estimate_weight_percentile;
use crate::reference::ReferenceTable;
use crate::series::{
    build_point_annotations, build_reference_curves, build_user_trend, GrowthChartData,
};
use crate::store::{merge_by_date, MeasurementRepository, ProfileRepository};
use chrono::NaiveDate;

/// Raw readings for one date, already in SI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub head_cm: f64,
}

pub struct GrowthTracker<P, M> {
    profiles: P,
    measurements: M,
    reference: ReferenceTable,
}

impl<P: ProfileRepository, M: MeasurementRepository> GrowthTracker<P, M> {
    pub fn new(profiles: P, measurements: M, reference: ReferenceTable) -> Self {
        Self {
            profiles,
            measurements,
            reference,
        }
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub async fn profile(&self) -> Result<Option<Profile>, TrackerError> {
        Ok(self.profiles.get().await?)
    }

    async fn require_profile(&self) -> Result<Profile, TrackerError> {
        self.profiles
            .get()
            .await?
            .ok_or(TrackerError::Validation(ValidationError::NoProfile))
    }

    /// Create or edit the profile.
    ///
    /// Keeps the existing id. A changed birth date or gender re-derives age
    /// and percentile for every stored measurement.
    pub async fn save_profile(
        &self,
        name: &str,
        birth_date: NaiveDate,
        gender: Gender,
        today: NaiveDate,
    ) -> Result<Profile, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if birth_date > today {
            return Err(ValidationError::BirthDateInFuture.into());
        }

        let previous = self.profiles.get().await?;
        let profile = Profile {
            id: previous
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.to_string(),
            birth_date,
            gender,
        };
        self.profiles.set(&profile).await?;

        let needs_refresh = previous
            .as_ref()
            .is_some_and(|p| p.birth_date != birth_date || p.gender != gender);
        if needs_refresh {
            let refreshed: Vec<Measurement> = self
                .measurements
                .list()
                .await?
                .into_iter()
                .map(|m| self.derive(&profile, m))
                .collect();
            log::info!("Profile changed, re-derived {} measurements", refreshed.len());
            self.measurements.save_all(&refreshed).await?;
        }

        Ok(profile)
    }

    /// Delete the profile and every measurement recorded for it
    pub async fn delete_profile(&self) -> Result<(), TrackerError> {
        self.measurements.clear().await?;
        self.profiles.clear().await?;
        log::info!("Profile and measurements deleted");
        Ok(())
    }

    pub async fn measurements(&self) -> Result<Vec<Measurement>, TrackerError> {
        let mut all = self.measurements.list().await?;
        all.sort_by_key(|m| m.date);
        Ok(all)
    }

    pub async fn measurement_on(&self, date: NaiveDate) -> Result<Option<Measurement>, TrackerError> {
        Ok(self
            .measurements
            .list()
            .await?
            .into_iter()
            .find(|m| m.date == date))
    }

    /// Record readings for a date, replacing any entry already on that date
    pub async fn record_measurement(
        &self,
        date: NaiveDate,
        readings: Readings,
        today: NaiveDate,
    ) -> Result<Measurement, TrackerError> {
        let profile = self.require_profile().await?;
        validate(&profile, date, &readings, today)?;

        let id = self
            .measurement_on(date)
            .await?
            .map(|m| m.id)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let measurement = self.build(&profile, id, date, readings);

        self.measurements.add(measurement.clone()).await?;
        log::info!("Recorded measurement for {}", date);
        Ok(measurement)
    }

    /// Edit an existing measurement by id
    pub async fn update_measurement(
        &self,
        id: &str,
        date: NaiveDate,
        readings: Readings,
        today: NaiveDate,
    ) -> Result<Measurement, TrackerError> {
        let profile = self.require_profile().await?;
        validate(&profile, date, &readings, today)?;
        if let Some(other) = self.measurement_on(date).await? {
            if other.id != id {
                return Err(ValidationError::DateTaken(date).into());
            }
        }

        let measurement = self.build(&profile, id.to_string(), date, readings);
        self.measurements.update(measurement.clone()).await?;
        Ok(measurement)
    }

    pub async fn delete_measurement(&self, id: &str) -> Result<(), TrackerError> {
        let exists = self.measurements.list().await?.iter().any(|m| m.id == id);
        if !exists {
            return Err(StoreError::NotFound { id: id.to_string() }.into());
        }
        self.measurements.delete(id).await?;
        Ok(())
    }

    /// Generate synthetic measurements and merge them by date.
    ///
    /// Returns the full collection after the merge.
    pub async fn generate_demo_batch(
        &self,
        count: usize,
        today: NaiveDate,
    ) -> Result<Vec<Measurement>, TrackerError> {
        let profile = self.require_profile().await?;
        let batch = generate_batch(&profile, count, &self.reference, today, &mut rand::thread_rng());

        let merged = merge_by_date(self.measurements.list().await?, batch);
        self.measurements.save_all(&merged).await?;
        log::info!("Merged {} demo measurements, {} stored", count, merged.len());
        Ok(merged)
    }

    /// Reference curves, trend and annotations for the current profile
    pub async fn chart_data(
        &self,
        max_months: u32,
        ranks: &[u8],
    ) -> Result<GrowthChartData, TrackerError> {
        let profile = self.require_profile().await?;
        let measurements = self.measurements.list().await?;

        Ok(GrowthChartData {
            gender: profile.gender,
            max_months,
            curves: build_reference_curves(&self.reference, profile.gender, max_months, ranks),
            trend: build_user_trend(&measurements),
            annotations: build_point_annotations(&measurements, &self.reference, profile.gender),
        })
    }

    fn build(&self, profile: &Profile, id: String, date: NaiveDate, readings: Readings) -> Measurement {
        self.derive(
            profile,
            Measurement {
                id,
                date,
                age_in_days: 0,
                weight_kg: readings.weight_kg,
                height_cm: readings.height_cm,
                head_cm: readings.head_cm,
                weight_percentile: None,
            },
        )
    }

    /// Recompute the profile-dependent fields of a measurement
    fn derive(&self, profile: &Profile, mut measurement: Measurement) -> Measurement {
        measurement.age_in_days = age_in_days(profile.birth_date, measurement.date);
        measurement.weight_percentile = estimate_weight_percentile(
            &self.reference,
            months_from_days(measurement.age_in_days),
            measurement.weight_kg,
            profile.gender,
        );
        measurement
    }
}

fn validate(
    profile: &Profile,
    date: NaiveDate,
    readings: &Readings,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if date < profile.birth_date {
        return Err(ValidationError::DateBeforeBirth);
    }
    if date > today {
        return Err(ValidationError::DateInFuture);
    }
    if date > tracking_limit(profile.birth_date) {
        return Err(ValidationError::BeyondTrackedRange);
    }

    let fields = [
        ("Weight", readings.weight_kg),
        ("Height", readings.height_cm),
        ("Head circumference", readings.head_cm),
    ];
    for (field, value) in fields {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::NonPositive { field });
        }
    }
    Ok(())
}
