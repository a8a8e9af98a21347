//! Application layer: Use cases and services.
//!
//! This module orchestrates domain validation with the estimator port
//! to implement the risk assessment use case.

mod assessment;

pub use assessment::AssessmentService;
