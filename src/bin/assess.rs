//! Batch assessment: one patient record in, one risk assessment out, as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin assess -- [--compare] [--no-validate] [<record.json> | -]
//! ```
//!
//! Reads stdin when no path (or `-`) is given and writes pretty JSON to stdout.
//! Integer vitals must be whole numbers; out-of-range and negative values are
//! only rejected when validation is on.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use cardiopredict::adapters::rules::RuleTableEstimator;
use cardiopredict::application::AssessmentService;
use cardiopredict::{PatientRecord, RiskAssessment};

const USAGE: &str = "Usage: assess [--compare] [--no-validate] [<record.json> | -]";

#[derive(Debug, Default)]
struct Options {
    input: Option<PathBuf>,
    compare: bool,
    validate: bool,
    help: bool,
}

/// Assessment plus the optional comparison score.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    #[serde(flatten)]
    assessment: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    point_score: Option<f64>,
}

fn parse_args<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options {
        validate: true,
        ..Options::default()
    };

    for arg in args {
        match arg.as_str() {
            "--compare" => options.compare = true,
            "--no-validate" => options.validate = false,
            "-h" | "--help" => options.help = true,
            "-" => options.input = None,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            path => {
                if options.input.is_some() {
                    bail!("Only one input file is accepted\n{USAGE}");
                }
                options.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn read_input(input: Option<&PathBuf>) -> cardiopredict::Result<String> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(options: &Options, json: &str) -> Result<String> {
    let record =
        PatientRecord::from_json(json).context("Input is not a valid patient record")?;

    let service = AssessmentService::new(std::sync::Arc::new(RuleTableEstimator::new()));
    let assessment = if options.validate {
        service.run_assessment(&record)?
    } else {
        service.assess_unchecked(&record)
    };

    let output = Output {
        assessment,
        point_score: options
            .compare
            .then(|| service.comparison_score(&record)),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> Result<()> {
    let options = parse_args(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let json = read_input(options.input.as_ref()).with_context(|| match &options.input {
        Some(path) => format!("Cannot read {}", path.display()),
        None => "Cannot read stdin".to_string(),
    })?;
    println!("{}", run(&options, &json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_RECORD: &str = r#"{
        "age": 45, "gender": "male", "height": 170, "weight": 70,
        "systolicBP": 120, "diastolicBP": 80, "cholesterol": 200, "glucose": 90,
        "smoking": false, "alcohol": false, "physicalActivity": true, "familyHistory": false
    }"#;

    fn options(args: &[&str]) -> Options {
        parse_args(args.iter().map(|a| (*a).to_string())).expect("Should parse args")
    }

    #[test]
    fn test_parse_args() {
        let opts = options(&["--compare", "record.json"]);
        assert!(opts.compare);
        assert!(opts.validate);
        assert_eq!(opts.input, Some(PathBuf::from("record.json")));

        let opts = options(&["--no-validate", "-"]);
        assert!(!opts.validate);
        assert!(opts.input.is_none());

        assert!(options(&["--help"]).help);
        assert!(options(&["-h", "record.json"]).help);
        assert!(!options(&[]).help);

        assert!(parse_args(vec!["--bogus".to_string()]).is_err());
        assert!(parse_args(vec!["a.json".to_string(), "b.json".to_string()]).is_err());
    }

    #[test]
    fn test_run_default_record() {
        let out = run(&options(&[]), DEFAULT_RECORD).expect("Should assess");
        let value: serde_json::Value = serde_json::from_str(&out).expect("Should be JSON");

        assert_eq!(value["riskLevel"], "High");
        assert_eq!(value["riskPercentage"], 26);
        assert_eq!(value["factors"].as_array().map(Vec::len), Some(6));
        assert!(value.get("pointScore").is_none());
    }

    #[test]
    fn test_run_compare_adds_point_score() {
        let out = run(&options(&["--compare"]), DEFAULT_RECORD).expect("Should assess");
        let value: serde_json::Value = serde_json::from_str(&out).expect("Should be JSON");

        let point_score = value["pointScore"].as_f64().expect("Should have pointScore");
        assert!((point_score - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let record = DEFAULT_RECORD.replace("\"age\": 45", "\"age\": 12");

        let err = run(&options(&[]), &record).expect_err("Should reject age 12");
        assert!(err.to_string().contains("Age 12"));

        let out = run(&options(&["--no-validate"]), &record).expect("Should assess");
        assert!(out.contains("riskScore"));
    }

    #[test]
    fn test_negative_vitals_are_scored_without_validation() {
        let record = DEFAULT_RECORD.replace("\"systolicBP\": 120", "\"systolicBP\": -10");

        assert!(run(&options(&[]), &record).is_err());

        let out = run(&options(&["--no-validate"]), &record).expect("Should assess");
        let value: serde_json::Value = serde_json::from_str(&out).expect("Should be JSON");
        assert_eq!(value["riskPercentage"], 26);
        assert_eq!(value["factors"][1]["value"], "-10/80 mmHg");
        // diastolic 80 still reads as elevated
        assert_eq!(value["factors"][1]["impact"], "negative");
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(run(&options(&[]), "{\"age\": 45}").is_err());
        assert!(run(&options(&[]), "not json").is_err());

        let fractional = DEFAULT_RECORD.replace("\"age\": 45", "\"age\": 45.5");
        assert!(run(&options(&["--no-validate"]), &fractional).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = PathBuf::from("/nonexistent/cardiopredict/record.json");
        assert!(matches!(
            read_input(Some(&missing)),
            Err(cardiopredict::CardioPredictError::Io(_))
        ));
    }
}
