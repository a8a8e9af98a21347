//! Domain layer: Core business types.
//!
//! Pure Rust types with no I/O. All types are serializable and the
//! patient record carries its own range validation.

mod assessment;
mod patient;

pub use assessment::{
    clamp_score, to_percentage, Impact, RiskAssessment, RiskFactor, RiskLevel, LOW_RISK_CEILING,
    MODERATE_RISK_CEILING,
};
pub use patient::{ranges, Gender, PatientRecord};
