//! Patient record types for cardiovascular risk assessment.
//!
//! The record is the contract between the patient form and the estimator:
//! the form collects and range-checks it, the estimator consumes it as-is.

use serde::{Deserialize, Serialize};

/// Biological sex as used by the risk rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// The other variant (used by the form's choice toggle).
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// Clinical attributes collected by the patient form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Age in years (18-100)
    pub age: i32,

    pub gender: Gender,

    /// Height in cm (100-250)
    pub height: f64,

    /// Weight in kg (30-200)
    pub weight: f64,

    /// Systolic blood pressure in mmHg
    #[serde(rename = "systolicBP")]
    pub systolic_bp: i32,

    /// Diastolic blood pressure in mmHg
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: i32,

    /// Total cholesterol in mg/dL
    pub cholesterol: i32,

    /// Fasting glucose in mg/dL
    pub glucose: i32,

    pub smoking: bool,
    pub alcohol: bool,
    pub physical_activity: bool,
    pub family_history: bool,
}

/// Inclusive domain ranges enforced by the form before a record reaches the estimator.
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const AGE: RangeInclusive<i32> = 18..=100;
    pub const HEIGHT: RangeInclusive<f64> = 100.0..=250.0;
    pub const WEIGHT: RangeInclusive<f64> = 30.0..=200.0;
    pub const SYSTOLIC_BP: RangeInclusive<i32> = 80..=250;
    pub const DIASTOLIC_BP: RangeInclusive<i32> = 40..=150;
    pub const CHOLESTEROL: RangeInclusive<i32> = 100..=400;
    pub const GLUCOSE: RangeInclusive<i32> = 60..=300;
}

impl Default for PatientRecord {
    /// The values the patient form opens with.
    fn default() -> Self {
        Self {
            age: 45,
            gender: Gender::Male,
            height: 170.0,
            weight: 70.0,
            systolic_bp: 120,
            diastolic_bp: 80,
            cholesterol: 200,
            glucose: 90,
            smoking: false,
            alcohol: false,
            physical_activity: true,
            family_history: false,
        }
    }
}

impl PatientRecord {
    /// Parse a record from its JSON form (camelCase field names).
    ///
    /// Only the shape is checked here; ranges are left to [`Self::validate`].
    ///
    /// # Errors
    /// Returns `CardioPredictError::Serialization` for malformed JSON, missing
    /// fields, or values of the wrong type.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Body mass index, weight(kg) / height(m)^2.
    ///
    /// Not stored; a zero height yields a non-finite value, which every
    /// threshold comparison treats as "not reached" or "exceeded" without panicking.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let meters = self.height / 100.0;
        self.weight / (meters * meters)
    }

    /// Validate that all attributes are within the form's domain ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !ranges::AGE.contains(&self.age) {
            errors.push(format!("Age {} out of range [18, 100]", self.age));
        }
        if !self.height.is_finite() || !ranges::HEIGHT.contains(&self.height) {
            errors.push(format!("Height {} out of range [100, 250]", self.height));
        }
        if !self.weight.is_finite() || !ranges::WEIGHT.contains(&self.weight) {
            errors.push(format!("Weight {} out of range [30, 200]", self.weight));
        }
        if !ranges::SYSTOLIC_BP.contains(&self.systolic_bp) {
            errors.push(format!(
                "Systolic BP {} out of range [80, 250]",
                self.systolic_bp
            ));
        }
        if !ranges::DIASTOLIC_BP.contains(&self.diastolic_bp) {
            errors.push(format!(
                "Diastolic BP {} out of range [40, 150]",
                self.diastolic_bp
            ));
        }
        if !ranges::CHOLESTEROL.contains(&self.cholesterol) {
            errors.push(format!(
                "Cholesterol {} out of range [100, 400]",
                self.cholesterol
            ));
        }
        if !ranges::GLUCOSE.contains(&self.glucose) {
            errors.push(format!("Glucose {} out of range [60, 300]", self.glucose));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        let record = PatientRecord::default();
        // 70 / 1.7^2
        assert!((record.bmi() - 24.221_453_287).abs() < 1e-6);
    }

    #[test]
    fn test_bmi_zero_height_does_not_panic() {
        let record = PatientRecord {
            height: 0.0,
            ..Default::default()
        };
        assert!(record.bmi().is_infinite());
    }

    #[test]
    fn test_validation() {
        assert!(PatientRecord::default().validate().is_ok());

        let invalid = PatientRecord {
            age: 10,
            height: 90.0,
            glucose: 500,
            ..Default::default()
        };
        let errors = invalid.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Age"));
    }

    #[test]
    fn test_validation_rejects_non_finite() {
        let invalid = PatientRecord {
            weight: f64::NAN,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(PatientRecord::default()).expect("Should serialize");
        assert_eq!(json["systolicBP"], 120);
        assert_eq!(json["diastolicBP"], 80);
        assert_eq!(json["physicalActivity"], true);
        assert_eq!(json["familyHistory"], false);
        assert_eq!(json["gender"], "male");
    }

    #[test]
    fn test_from_json_accepts_out_of_range_integers() {
        let json = serde_json::to_string(&PatientRecord {
            age: -3,
            systolic_bp: -10,
            ..Default::default()
        })
        .expect("Should serialize");

        let record = PatientRecord::from_json(&json).expect("Should parse");
        assert_eq!(record.age, -3);
        assert_eq!(record.systolic_bp, -10);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_from_json_errors() {
        for bad in ["not json", r#"{"age": 45}"#, r#"{"age": 45.5}"#] {
            assert!(matches!(
                PatientRecord::from_json(bad),
                Err(crate::CardioPredictError::Serialization(_))
            ));
        }
    }

    #[test]
    fn test_gender_toggle() {
        assert_eq!(Gender::Male.toggled(), Gender::Female);
        assert_eq!(Gender::Female.toggled(), Gender::Male);
    }
}
