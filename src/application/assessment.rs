//! Assessment service: Validates patient records and runs the estimator.
//!
//! The estimator itself never fails; this service is where the form's
//! domain ranges are enforced and where outcomes are logged.

use std::sync::Arc;

use crate::adapters::points::point_score;
use crate::domain::{PatientRecord, RiskAssessment};
use crate::ports::RiskEstimator;
use crate::CardioPredictError;

/// Service for running risk assessments.
pub struct AssessmentService<E>
where
    E: RiskEstimator,
{
    estimator: Arc<E>,
}

impl<E> Clone for AssessmentService<E>
where
    E: RiskEstimator,
{
    fn clone(&self) -> Self {
        Self {
            estimator: Arc::clone(&self.estimator),
        }
    }
}

impl<E> AssessmentService<E>
where
    E: RiskEstimator,
{
    /// Create a new assessment service.
    pub fn new(estimator: Arc<E>) -> Self {
        Self { estimator }
    }

    /// Name of the underlying estimator.
    #[must_use]
    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// Validate a record against the form domain ranges, then assess it.
    ///
    /// # Errors
    /// Returns `CardioPredictError::Validation` listing every out-of-range field.
    pub fn run_assessment(
        &self,
        record: &PatientRecord,
    ) -> Result<RiskAssessment, CardioPredictError> {
        if let Err(errors) = record.validate() {
            tracing::warn!(count = errors.len(), "Rejected patient record");
            return Err(CardioPredictError::Validation(errors.join(", ")));
        }

        Ok(self.assess_unchecked(record))
    }

    /// Assess without range validation.
    ///
    /// The estimator is total over finite input, so this still returns a
    /// bounded result for out-of-domain values.
    #[must_use]
    pub fn assess_unchecked(&self, record: &PatientRecord) -> RiskAssessment {
        let assessment = self.estimator.assess(record);

        tracing::info!(
            "Assessment complete: estimator={}, level={}, percentage={}",
            self.estimator.name(),
            assessment.risk_level,
            assessment.risk_percentage
        );
        tracing::debug!(
            "Assessment detail: factors={}, recommendations={}",
            assessment.factors.len(),
            assessment.recommendations.len()
        );

        assessment
    }

    /// Secondary point-based score for comparison, as a fraction.
    #[must_use]
    pub fn comparison_score(&self, record: &PatientRecord) -> f64 {
        point_score(record)
    }
}
