//! Ports layer: Trait definitions at the estimator boundary.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application services and the scoring implementation.

mod estimator;

pub use estimator::RiskEstimator;
