//! Estimator port: Trait for cardiovascular risk estimation.
//!
//! This trait decouples the application layer from the concrete rule set.

use crate::domain::{PatientRecord, RiskAssessment};

/// Trait for risk estimators.
///
/// Implementations must be pure: the same record always yields the same
/// assessment, and no call observes another.
pub trait RiskEstimator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Assess a patient record.
    ///
    /// Never fails. Out-of-domain numeric input still yields a score in [0, 1];
    /// range checks belong to the caller.
    fn assess(&self, record: &PatientRecord) -> RiskAssessment;
}
