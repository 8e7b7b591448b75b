//! # Domain Models
//!
//! The caregiver profile and the dated growth measurements recorded for it.
//! Wire names are camelCase so stored blobs keep the `birthDate` / `weightKg`
//! shape the stores have always used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sex used to select the reference population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Section name of this gender in the reference asset
    pub fn reference_key(&self) -> &'static str {
        match self {
            Gender::Male => "boys",
            Gender::Female => "girls",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "boy" | "m" => Ok(Gender::Male),
            "female" | "girl" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// The single child being tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// One dated set of readings.
///
/// `age_in_days` is derived from the profile's birth date and must be
/// recomputed whenever either date changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub date: NaiveDate,
    pub age_in_days: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub head_cm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_percentile: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_profile_wire_format() {
        let json = r#"{"id":"1","name":"Ada","birthDate":"2024-03-01","gender":"female"}"#;
        let profile: Profile = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(profile.gender, Gender::Female);

        let back = serde_json::to_string(&profile).expect("Failed to serialize");
        assert!(back.contains("\"birthDate\":\"2024-03-01\""));
    }

    #[test]
    fn test_measurement_ignores_legacy_percentile_fields() {
        let json = r#"{
            "id": "42",
            "date": "2024-04-01",
            "ageInDays": 31,
            "weightKg": 4.5,
            "heightCm": 54.0,
            "headCm": 37.1,
            "weightPercentile": 48.2,
            "heightPercentile": 50.0
        }"#;
        let m: Measurement = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(m.age_in_days, 31);
        assert_eq!(m.weight_percentile, Some(48.2));
    }

    #[test]
    fn test_missing_percentile_is_not_serialized() {
        let m = Measurement {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            age_in_days: 0,
            weight_kg: 3.4,
            height_cm: 50.0,
            head_cm: 34.0,
            weight_percentile: None,
        };
        let json = serde_json::to_string(&m).expect("Failed to serialize");
        assert!(!json.contains("weightPercentile"));
    }
}
