//! Adapters layer: Concrete implementations of ports.
//!
//! - `rules`: the rule-table risk estimator
//! - `points`: the simplified point score used for comparison
//! - `sanitize`: patient-data filtering for logs

pub mod points;
pub mod rules;
pub mod sanitize;
