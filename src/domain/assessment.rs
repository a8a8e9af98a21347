//! Risk assessment result types.
//!
//! Represents the output of the rule-based cardiovascular risk estimator.

use serde::{Deserialize, Serialize};

/// Upper bound of the Low band (exclusive).
pub const LOW_RISK_CEILING: f64 = 0.10;

/// Upper bound of the Moderate band (exclusive).
pub const MODERATE_RISK_CEILING: f64 = 0.20;

/// Risk level classification for cardiovascular disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk of cardiovascular disease
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, intervention recommended
    High,
}

impl RiskLevel {
    /// Classify a clamped risk score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < LOW_RISK_CEILING {
            Self::Low
        } else if score < MODERATE_RISK_CEILING {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Clinical review advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Direction in which a factor moves the patient's risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

/// A named clinical attribute annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub value: String,
    pub impact: Impact,
    pub description: String,
}

/// Complete estimator output for one patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Accumulated rule score, clamped to [0, 1]
    pub risk_score: f64,

    pub risk_level: RiskLevel,

    /// round(risk_score * 100)
    pub risk_percentage: u8,

    /// Always six entries: Age, Blood Pressure, Cholesterol, BMI, Smoking Status, Physical Activity
    pub factors: Vec<RiskFactor>,

    /// In rule evaluation order
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// Build an assessment from a raw accumulated score.
    ///
    /// Clamps the score, derives level and percentage from the clamped value.
    #[must_use]
    pub fn from_score(
        raw_score: f64,
        factors: Vec<RiskFactor>,
        recommendations: Vec<String>,
    ) -> Self {
        let risk_score = clamp_score(raw_score);
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            risk_percentage: to_percentage(risk_score),
            factors,
            recommendations,
        }
    }
}

/// Clamp a raw score into [0, 1]. NaN maps to 0.
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Round-half-up percentage of a clamped score.
#[must_use]
pub fn to_percentage(score: f64) -> u8 {
    // score is in [0, 1], so the rounded value fits in 0..=100
    (clamp_score(score) * 100.0).round() as u8
}
