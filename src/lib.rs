//! # CardioPredict
//!
//! Rule-based cardiovascular disease risk assessment.
//!
//! This crate provides:
//! - A deterministic estimator mapping a patient record to a risk score,
//!   risk level, contributing factors and recommendations
//! - A simplified point score for comparison
//! - Terminal UI with a patient form and result display
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, RiskAssessment, RiskLevel)
//! - `ports`: Trait definitions at the estimator boundary
//! - `adapters`: Concrete implementations (rule tables, point score, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use adapters::points::point_score;
pub use adapters::rules::{assess, RuleTableEstimator};
pub use domain::{Gender, Impact, PatientRecord, RiskAssessment, RiskFactor, RiskLevel};

/// Result type for CardioPredict operations
pub type Result<T> = std::result::Result<T, CardioPredictError>;

/// Main error type for CardioPredict
#[derive(Debug, thiserror::Error)]
pub enum CardioPredictError {
    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
