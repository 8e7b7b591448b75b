//! Unit conversion for user-entered values. Storage is always kg / cm.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_IN: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    In,
}

impl WeightUnit {
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg / KG_PER_LB,
        }
    }
}

impl LengthUnit {
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Cm => value,
            LengthUnit::In => value * CM_PER_IN,
        }
    }

    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            LengthUnit::Cm => cm,
            LengthUnit::In => cm / CM_PER_IN,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lb => write!(f, "lb"),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Cm => write!(f, "cm"),
            LengthUnit::In => write!(f, "in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pounds() {
        assert!((WeightUnit::Lb.to_kg(10.0) - 4.53592).abs() < 1e-9);
        assert!((WeightUnit::Lb.from_kg(4.53592) - 10.0).abs() < 1e-9);
        assert_eq!(WeightUnit::Kg.to_kg(3.2), 3.2);
    }

    #[test]
    fn test_inches() {
        assert!((LengthUnit::In.to_cm(20.0) - 50.8).abs() < 1e-9);
        assert_eq!(LengthUnit::Cm.from_cm(50.0), 50.0);
    }
}
