//! Simplified Framingham-style point score.
//!
//! A secondary estimator over age, total cholesterol and smoking only.
//! It is shown next to the rule-table result for comparison and never
//! feeds into `assess`.

use crate::domain::{Gender, PatientRecord};

/// (minimum age, points), oldest bracket first.
const MALE_AGE_POINTS: [(i32, u32); 7] = [
    (70, 11),
    (65, 10),
    (60, 8),
    (55, 6),
    (50, 4),
    (45, 2),
    (40, 1),
];

const FEMALE_AGE_POINTS: [(i32, u32); 7] = [
    (70, 12),
    (65, 11),
    (60, 9),
    (55, 7),
    (50, 5),
    (45, 3),
    (40, 1),
];

const CHOLESTEROL_POINTS: [(i32, u32); 3] = [(280, 3), (240, 2), (200, 1)];

const MIN_PERCENT: u32 = 1;
const MAX_PERCENT: u32 = 30;

fn bracket_points(value: i32, brackets: &[(i32, u32)]) -> u32 {
    brackets
        .iter()
        .find(|(minimum, _)| value >= *minimum)
        .map_or(0, |(_, points)| *points)
}

/// Total points for a record.
#[must_use]
pub fn point_score_points(record: &PatientRecord) -> u32 {
    let age_table = match record.gender {
        Gender::Male => &MALE_AGE_POINTS,
        Gender::Female => &FEMALE_AGE_POINTS,
    };

    let smoking = match (record.smoking, record.gender) {
        (false, _) => 0,
        (true, Gender::Male) => 4,
        (true, Gender::Female) => 3,
    };

    bracket_points(record.age, age_table)
        + bracket_points(record.cholesterol, &CHOLESTEROL_POINTS)
        + smoking
}

/// Point-based risk as a fraction in [0.01, 0.30].
#[must_use]
pub fn point_score(record: &PatientRecord) -> f64 {
    let percent = point_score_points(record)
        .saturating_mul(2)
        .clamp(MIN_PERCENT, MAX_PERCENT);
    f64::from(percent) / 100.0
}
