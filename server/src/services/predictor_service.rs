//! Vehicle-count inference from the pre-trained regression artifact.
//!
//! The artifact is a JSON bundle of two coefficients and an intercept,
//! loaded once at startup and shared read-only across requests. The
//! feature vector is `[epoch_seconds, junction]`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),
    #[error("invalid junction: {0}")]
    InvalidJunction(String),
    #[error("prediction failed: {0}")]
    Inference(String),
}

/// Accepted datetime layouts; the first matches the ISO form, the last
/// matches what an HTML `datetime-local` input submits.
const DATETIME_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Deserialize)]
pub struct PredictiveModel {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    feature_names: Vec<String>,
}

impl PredictiveModel {
    /// Load and validate the artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact at {}", path.display()))?;
        let model: Self =
            serde_json::from_str(&raw).context("failed to parse model artifact")?;

        if model.coefficients.len() != 2 {
            bail!(
                "unexpected coefficient count: {} (want 2)",
                model.coefficients.len()
            );
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            bail!("model artifact contains non-finite parameters");
        }
        if !model.feature_names.is_empty() && model.feature_names.len() != 2 {
            bail!(
                "feature name count does not match coefficients: {:?}",
                model.feature_names
            );
        }

        Ok(model)
    }

    pub fn predict(&self, features: [f64; 2]) -> f64 {
        self.intercept + self.coefficients[0] * features[0] + self.coefficients[1] * features[1]
    }

    /// Full request path: datetime string + junction id to a truncated
    /// vehicle count.
    pub fn predict_count(&self, datetime: &str, junction: &str) -> Result<i64, PredictError> {
        let timestamp = parse_datetime(datetime)?;
        let junction: i64 = junction
            .trim()
            .parse()
            .map_err(|_| PredictError::InvalidJunction(junction.trim().to_string()))?;

        let predicted = self.predict([timestamp, junction as f64]);
        if !predicted.is_finite() {
            return Err(PredictError::Inference(format!(
                "non-finite result for junction {junction}"
            )));
        }

        Ok(predicted as i64)
    }
}

/// Convert a datetime string to epoch seconds.
pub fn parse_datetime(input: &str) -> Result<f64, PredictError> {
    let input = input.trim();
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, layout) {
            return Ok(dt.and_utc().timestamp() as f64);
        }
    }
    Err(PredictError::InvalidDatetime(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn model(coefficients: [f64; 2], intercept: f64) -> PredictiveModel {
        PredictiveModel {
            coefficients: coefficients.to_vec(),
            intercept,
            feature_names: vec![],
        }
    }

    fn write_artifact(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn accepted_datetime_layouts_parse() {
        let iso = parse_datetime("2024-01-15T08:30:00").unwrap();
        assert_eq!(iso, 1705307400.0);
        assert_eq!(parse_datetime("2024-01-15 08:30:00").unwrap(), iso);
        assert_eq!(parse_datetime("2024-01-15T08:30").unwrap(), iso);
        assert_eq!(parse_datetime("  2024-01-15T08:30:00  ").unwrap(), iso);
    }

    #[test]
    fn malformed_datetime_is_an_error() {
        assert!(parse_datetime("15/01/2024").is_err());
        assert!(parse_datetime("not a date").is_err());
        assert!(parse_datetime("").is_err());
    }

    #[test]
    fn prediction_matches_linear_form() {
        let m = model([2.0, 10.0], 5.0);
        assert_eq!(m.predict([3.0, 4.0]), 5.0 + 2.0 * 3.0 + 10.0 * 4.0);
    }

    #[test]
    fn predict_count_truncates_to_integer() {
        let m = model([0.0, 10.5], 1.2);
        // 1.2 + 10.5 * 3 = 32.7 -> 32
        assert_eq!(m.predict_count("2024-06-01T09:00:00", "3").unwrap(), 32);
    }

    #[test]
    fn predict_count_rejects_bad_inputs() {
        let m = model([0.0, 1.0], 0.0);
        assert!(matches!(
            m.predict_count("garbage", "1"),
            Err(PredictError::InvalidDatetime(_))
        ));
        assert!(matches!(
            m.predict_count("2024-06-01T09:00:00", "two"),
            Err(PredictError::InvalidJunction(_))
        ));
        assert_eq!(m.predict_count("2024-06-01T09:00:00", " 2 ").unwrap(), 2);
    }

    #[test]
    fn artifact_loads_from_disk() {
        let file = write_artifact(
            r#"{"feature_names": ["timestamp", "junction"], "coefficients": [0.0, 250.0], "intercept": 40.0}"#,
        );
        let m = PredictiveModel::load(file.path()).unwrap();
        assert_eq!(m.predict([0.0, 2.0]), 540.0);
    }

    #[test]
    fn artifact_with_wrong_arity_is_rejected() {
        let file = write_artifact(r#"{"coefficients": [1.0, 2.0, 3.0], "intercept": 0.0}"#);
        assert!(PredictiveModel::load(file.path()).is_err());

        let file = write_artifact(r#"{"coefficients": [1.0, 2.0], "intercept": 0.0, "feature_names": ["only_one"]}"#);
        assert!(PredictiveModel::load(file.path()).is_err());
    }

    #[test]
    fn missing_artifact_is_an_error() {
        assert!(PredictiveModel::load(Path::new("/nonexistent/model.json")).is_err());
    }
}
