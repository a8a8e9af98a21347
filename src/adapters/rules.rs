//! Rule-table estimator: the primary cardiovascular risk model.
//!
//! The model is three declarative tables evaluated in order:
//! - `SCORE_RULES`: additive contributions summed into the risk score
//! - `FACTOR_RULES`: the six display factors
//! - `RECOMMENDATION_RULES`: conditional clinical recommendations
//!
//! Factor impacts reuse the score thresholds but collapse the top two tiers
//! into a single `Negative`, while descriptions keep all three tiers.

use crate::domain::{Gender, Impact, PatientRecord, RiskAssessment, RiskFactor, RiskLevel};
use crate::ports::RiskEstimator;

/// Values every rule reads. BMI is derived once per call.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub record: &'a PatientRecord,
    pub bmi: f64,
}

impl<'a> RuleInput<'a> {
    #[must_use]
    pub fn new(record: &'a PatientRecord) -> Self {
        Self {
            record,
            bmi: record.bmi(),
        }
    }

    fn hypertensive(&self) -> bool {
        self.record.systolic_bp >= 140 || self.record.diastolic_bp >= 90
    }

    fn elevated_bp(&self) -> bool {
        self.record.systolic_bp >= 120 || self.record.diastolic_bp >= 80
    }
}

// === Thresholds ===

/// (minimum value, weight), highest tier first.
type Tiers = [(f64, f64)];

const AGE_TIERS: &Tiers = &[(65.0, 0.25), (55.0, 0.15), (45.0, 0.08), (35.0, 0.03)];
const CHOLESTEROL_TIERS: &Tiers = &[(240.0, 0.15), (200.0, 0.08)];
const GLUCOSE_TIERS: &Tiers = &[(126.0, 0.12), (100.0, 0.05)];
const BMI_TIERS: &Tiers = &[(30.0, 0.10), (25.0, 0.05)];

const BP_WEIGHT: f64 = 0.2;
const SYSTOLIC_BASELINE: f64 = 120.0;
const SYSTOLIC_SPAN: f64 = 160.0;
const DIASTOLIC_BASELINE: f64 = 80.0;
const DIASTOLIC_SPAN: f64 = 100.0;

/// Weight of the first tier whose threshold `value` reaches, or 0.
fn tier_weight(value: f64, tiers: &Tiers) -> f64 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0.0, |(_, weight)| *weight)
}

fn flag(condition: bool, weight: f64) -> f64 {
    if condition {
        weight
    } else {
        0.0
    }
}

// === Score rules ===

/// One additive contribution to the risk score.
pub struct ScoreRule {
    pub name: &'static str,
    pub contribution: fn(&RuleInput<'_>) -> f64,
}

/// Score contributions, summed in this order.
pub const SCORE_RULES: [ScoreRule; 10] = [
    ScoreRule {
        name: "age",
        contribution: |i| tier_weight(f64::from(i.record.age), AGE_TIERS),
    },
    ScoreRule {
        name: "gender_age",
        contribution: |i| match i.record.gender {
            Gender::Male => flag(i.record.age >= 45, 0.10),
            Gender::Female => flag(i.record.age >= 55, 0.08),
        },
    },
    ScoreRule {
        name: "blood_pressure",
        contribution: |i| {
            let systolic =
                ((f64::from(i.record.systolic_bp) - SYSTOLIC_BASELINE) / SYSTOLIC_SPAN).max(0.0);
            let diastolic = ((f64::from(i.record.diastolic_bp) - DIASTOLIC_BASELINE)
                / DIASTOLIC_SPAN)
                .max(0.0);
            systolic.max(diastolic) * BP_WEIGHT
        },
    },
    ScoreRule {
        name: "cholesterol",
        contribution: |i| tier_weight(f64::from(i.record.cholesterol), CHOLESTEROL_TIERS),
    },
    ScoreRule {
        name: "glucose",
        contribution: |i| tier_weight(f64::from(i.record.glucose), GLUCOSE_TIERS),
    },
    ScoreRule {
        name: "bmi",
        contribution: |i| tier_weight(i.bmi, BMI_TIERS),
    },
    ScoreRule {
        name: "smoking",
        contribution: |i| flag(i.record.smoking, 0.15),
    },
    ScoreRule {
        name: "alcohol",
        contribution: |i| flag(i.record.alcohol, 0.05),
    },
    ScoreRule {
        name: "physical_inactivity",
        contribution: |i| flag(!i.record.physical_activity, 0.08),
    },
    ScoreRule {
        name: "family_history",
        contribution: |i| flag(i.record.family_history, 0.10),
    },
];

/// Sum of all score rules, before clamping.
#[must_use]
pub fn raw_score(input: &RuleInput<'_>) -> f64 {
    SCORE_RULES.iter().fold(0.0, |acc, rule| {
        let contribution = (rule.contribution)(input);
        tracing::trace!(rule = rule.name, contribution, "score rule");
        acc + contribution
    })
}

// === Factor rules ===

/// Produces one display factor.
pub struct FactorRule {
    pub name: &'static str,
    pub value: fn(&RuleInput<'_>) -> String,
    pub grade: fn(&RuleInput<'_>) -> (Impact, &'static str),
}

/// Display factors, in presentation order.
pub const FACTOR_RULES: [FactorRule; 6] = [
    FactorRule {
        name: "Age",
        value: |i| format!("{} years", i.record.age),
        grade: |i| match i.record.age {
            a if a >= 65 => (Impact::Negative, "Advanced age significantly increases risk"),
            a if a >= 45 => (Impact::Negative, "Age is a moderate risk factor"),
            _ => (Impact::Neutral, "Age is not a significant risk factor"),
        },
    },
    FactorRule {
        name: "Blood Pressure",
        value: |i| format!("{}/{} mmHg", i.record.systolic_bp, i.record.diastolic_bp),
        grade: |i| {
            if i.hypertensive() {
                (Impact::Negative, "Hypertensive - significant risk factor")
            } else if i.elevated_bp() {
                (Impact::Negative, "Elevated blood pressure")
            } else {
                (Impact::Positive, "Normal blood pressure")
            }
        },
    },
    FactorRule {
        name: "Cholesterol",
        value: |i| format!("{} mg/dL", i.record.cholesterol),
        grade: |i| match i.record.cholesterol {
            c if c >= 240 => (Impact::Negative, "High cholesterol - major risk factor"),
            c if c >= 200 => (Impact::Negative, "Borderline high cholesterol"),
            _ => (Impact::Positive, "Optimal cholesterol level"),
        },
    },
    FactorRule {
        name: "BMI",
        value: |i| format!("{:.1}", i.bmi),
        grade: |i| {
            if i.bmi >= 30.0 {
                (Impact::Negative, "Obese - increased cardiovascular risk")
            } else if i.bmi >= 25.0 {
                (Impact::Negative, "Overweight - moderate risk factor")
            } else {
                (Impact::Positive, "Healthy weight range")
            }
        },
    },
    FactorRule {
        name: "Smoking Status",
        value: |i| {
            if i.record.smoking {
                "Current smoker".to_string()
            } else {
                "Non-smoker".to_string()
            }
        },
        grade: |i| {
            if i.record.smoking {
                (
                    Impact::Negative,
                    "Smoking significantly increases cardiovascular risk",
                )
            } else {
                (Impact::Positive, "Non-smoking status reduces risk")
            }
        },
    },
    FactorRule {
        name: "Physical Activity",
        value: |i| {
            if i.record.physical_activity {
                "Active".to_string()
            } else {
                "Sedentary".to_string()
            }
        },
        grade: |i| {
            if i.record.physical_activity {
                (
                    Impact::Positive,
                    "Regular exercise reduces cardiovascular risk",
                )
            } else {
                (Impact::Negative, "Sedentary lifestyle increases risk")
            }
        },
    },
];

/// Evaluate every factor rule in order.
#[must_use]
pub fn factors(input: &RuleInput<'_>) -> Vec<RiskFactor> {
    FACTOR_RULES
        .iter()
        .map(|rule| {
            let (impact, description) = (rule.grade)(input);
            RiskFactor {
                name: rule.name.to_string(),
                value: (rule.value)(input),
                impact,
                description: description.to_string(),
            }
        })
        .collect()
}

// === Recommendation rules ===

/// A recommendation emitted when its condition holds.
pub struct RecommendationRule {
    pub applies: fn(&RuleInput<'_>, RiskLevel) -> bool,
    pub text: &'static str,
}

pub const FOLLOW_UP: &str = "Regular follow-up appointments for cardiovascular risk monitoring";
pub const ASPIRIN: &str = "Consider aspirin therapy if indicated and no contraindications";
pub const CARDIOLOGY: &str = "Cardiology consultation for comprehensive risk stratification";

/// Recommendations, appended in this order. Never sorted or deduplicated.
pub const RECOMMENDATION_RULES: [RecommendationRule; 9] = [
    RecommendationRule {
        applies: |i, _| i.record.smoking,
        text: "Smoking cessation counseling and support programs are strongly recommended",
    },
    RecommendationRule {
        applies: |i, _| i.hypertensive(),
        text: "Blood pressure management with lifestyle modifications and/or medication",
    },
    RecommendationRule {
        applies: |i, _| i.record.cholesterol >= 200,
        text: "Lipid management through diet, exercise, and possible statin therapy",
    },
    RecommendationRule {
        applies: |i, _| i.bmi >= 25.0,
        text: "Weight management through caloric restriction and increased physical activity",
    },
    RecommendationRule {
        applies: |i, _| !i.record.physical_activity,
        text: "Initiate regular aerobic exercise program (150 minutes moderate intensity per week)",
    },
    RecommendationRule {
        applies: |i, _| i.record.glucose >= 100,
        text: "Blood glucose monitoring and diabetes management if indicated",
    },
    RecommendationRule {
        applies: |_, _| true,
        text: FOLLOW_UP,
    },
    RecommendationRule {
        applies: |_, _| true,
        text: ASPIRIN,
    },
    RecommendationRule {
        applies: |_, level| level == RiskLevel::High,
        text: CARDIOLOGY,
    },
];

/// Evaluate every recommendation rule in order, keeping those that apply.
#[must_use]
pub fn recommendations(input: &RuleInput<'_>, level: RiskLevel) -> Vec<String> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(input, level))
        .map(|rule| rule.text.to_string())
        .collect()
}

/// Assess a patient record with the rule tables.
#[must_use]
pub fn assess(record: &PatientRecord) -> RiskAssessment {
    let input = RuleInput::new(record);

    let score = raw_score(&input);
    let level = RiskLevel::from_score(crate::domain::clamp_score(score));

    RiskAssessment::from_score(score, factors(&input), recommendations(&input, level))
}

/// `RiskEstimator` backed by the static rule tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTableEstimator;

impl RuleTableEstimator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RiskEstimator for RuleTableEstimator {
    fn name(&self) -> &'static str {
        "rule-table"
    }

    fn assess(&self, record: &PatientRecord) -> RiskAssessment {
        assess(record)
    }
}
