//! # Persistence
//!
//! Repository traits for the profile and the measurement collection, with a
//! JSON-file implementation for the app and an in-memory one for tests and
//! demos.
//!
//! ## Storage Layout
//! ```text
//! <data_dir>/
//! ├── growth_v1_profile.json       (single Profile object)
//! └── growth_v1_measurements.json  (array of Measurement)
//! ```
//!
//! ## Semantics
//! - `add` upserts by calendar date: a measurement on an existing date replaces it
//! - `update` and `delete` address measurements by id
//! - Last write wins; there is no cross-writer conflict detection
//! - Callers re-read after mutating; nothing is pushed to them

use crate::error::StoreError;
use crate::models::{Measurement, Profile};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const PROFILE_KEY: &str = "growth/v1/profile";
pub const MEASUREMENTS_KEY: &str = "growth/v1/measurements";

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Profile>, StoreError>;
    async fn set(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// All stored measurements, in storage order
    async fn list(&self) -> Result<Vec<Measurement>, StoreError>;

    /// Replace the whole collection
    async fn save_all(&self, measurements: &[Measurement]) -> Result<(), StoreError>;

    /// Insert, or overwrite the measurement recorded on the same date
    async fn add(&self, measurement: Measurement) -> Result<(), StoreError> {
        let mut existing = self.list().await?;
        upsert_by_date(&mut existing, measurement);
        self.save_all(&existing).await
    }

    /// Replace the measurement with the same id
    async fn update(&self, measurement: Measurement) -> Result<(), StoreError> {
        let mut existing = self.list().await?;
        let slot = existing
            .iter_mut()
            .find(|m| m.id == measurement.id)
            .ok_or_else(|| StoreError::NotFound {
                id: measurement.id.clone(),
            })?;
        *slot = measurement;
        self.save_all(&existing).await
    }

    /// Remove by id; removing an unknown id is a no-op
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut existing = self.list().await?;
        existing.retain(|m| m.id != id);
        self.save_all(&existing).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.save_all(&[]).await
    }
}

/// Overwrite the entry with the same date, or append
pub fn upsert_by_date(measurements: &mut Vec<Measurement>, measurement: Measurement) {
    match measurements.iter_mut().find(|m| m.date == measurement.date) {
        Some(slot) => *slot = measurement,
        None => measurements.push(measurement),
    }
}

/// Fold `incoming` into `existing` with the same date-upsert rule as `add`
pub fn merge_by_date(existing: Vec<Measurement>, incoming: Vec<Measurement>) -> Vec<Measurement> {
    let mut merged = existing;
    for measurement in incoming {
        upsert_by_date(&mut merged, measurement);
    }
    merged
}

/// Key-value blob store: one pretty-printed JSON file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace('/', "_")))
    }

    /// Read a value; a missing file is `None`
    pub async fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    log::error!("Stored data at {} is malformed: {}", path.display(), e);
                    Err(StoreError::Serde(e))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Write a value, replacing the file atomically
    pub async fn set_item<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileProfileRepository {
    store: JsonFileStore,
}

impl FileProfileRepository {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileRepository for FileProfileRepository {
    async fn get(&self) -> Result<Option<Profile>, StoreError> {
        self.store.get_item(PROFILE_KEY).await
    }

    async fn set(&self, profile: &Profile) -> Result<(), StoreError> {
        self.store.set_item(PROFILE_KEY, profile).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove_item(PROFILE_KEY).await
    }
}

#[derive(Debug, Clone)]
pub struct FileMeasurementRepository {
    store: JsonFileStore,
}

impl FileMeasurementRepository {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MeasurementRepository for FileMeasurementRepository {
    async fn list(&self) -> Result<Vec<Measurement>, StoreError> {
        Ok(self.store.get_item(MEASUREMENTS_KEY).await?.unwrap_or_default())
    }

    async fn save_all(&self, measurements: &[Measurement]) -> Result<(), StoreError> {
        self.store.set_item(MEASUREMENTS_KEY, &measurements).await
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    profile: RwLock<Option<Profile>>,
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn get(&self) -> Result<Option<Profile>, StoreError> {
        Ok(self.profile.read().await.clone())
    }

    async fn set(&self, profile: &Profile) -> Result<(), StoreError> {
        *self.profile.write().await = Some(profile.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.profile.write().await = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMeasurementRepository {
    measurements: RwLock<Vec<Measurement>>,
}

#[async_trait]
impl MeasurementRepository for MemoryMeasurementRepository {
    async fn list(&self) -> Result<Vec<Measurement>, StoreError> {
        Ok(self.measurements.read().await.clone())
    }

    async fn save_all(&self, measurements: &[Measurement]) -> Result<(), StoreError> {
        *self.measurements.write().await = measurements.to_vec();
        Ok(())
    }
}
