//! Response body of a successful submission
//!
//! Every field is optional. A missing key, a null, or a value of the wrong
//! type means there is nothing to show for that field, never a parse failure.
//! Only a body that is not JSON at all is rejected.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Take whatever is there, falling back to the default on null or wrong type
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Validation checks in response order; entries that are not objects are dropped
fn lenient_checks<'de, D>(
    deserializer: D,
) -> Result<Option<IndexMap<String, ValidationOutcome>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let checks = entries
        .into_iter()
        .filter(|(_, outcome)| outcome.is_object())
        .filter_map(|(name, outcome)| {
            ValidationOutcome::deserialize(outcome)
                .ok()
                .map(|outcome| (name, outcome))
        })
        .collect();
    Ok(Some(checks))
}

/// One named check reported by the processing service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default, deserialize_with = "lenient")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: String,
}

/// Intermediate artifacts produced while adapting the inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntermediateFiles {
    #[serde(default, deserialize_with = "lenient")]
    pub adapted_reference_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub adjusted_character_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub perspective_adjusted_path: Option<String>,
}

/// Parsed body of a 2xx response from the processing service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub generated_image_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub intermediate_files: Option<IntermediateFiles>,
    /// Keyed by check name, in the order the service sent them
    #[serde(default, deserialize_with = "lenient_checks")]
    pub validation_results: Option<IndexMap<String, ValidationOutcome>>,
    #[serde(default, deserialize_with = "lenient")]
    pub retry_count: Option<i64>,
    /// Composition analysis, passed through without interpretation
    #[serde(default)]
    pub analysis_result: Option<Value>,
}

impl ProcessingResult {
    /// Parse a 2xx body. Any well-formed JSON is accepted; a body that is not
    /// an object simply carries nothing to show.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value).unwrap_or_default())
    }

    pub fn adapted_reference_path(&self) -> Option<&str> {
        self.intermediate_files
            .as_ref()
            .and_then(|files| files.adapted_reference_path.as_deref())
    }
}

/// Error body shape; only the message is of interest
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_parses() {
        let result: ProcessingResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, ProcessingResult::default());
        assert!(result.adapted_reference_path().is_none());
    }

    #[test]
    fn test_full_body_parses() {
        let body = r#"{
            "status": "success",
            "message": "done",
            "generated_image_path": "/out/final.png",
            "intermediate_files": {
                "adapted_reference_path": "/out/adapted.png",
                "adjusted_character_path": "/out/adjusted.png",
                "perspective_adjusted_path": "/out/perspective.png"
            },
            "validation_results": {
                "pose_match": {"success": true, "score": 0.92, "feedback": "ok"}
            },
            "retry_count": 1,
            "analysis_result": {"shot_type": "medium"}
        }"#;
        let result: ProcessingResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.generated_image_path.as_deref(), Some("/out/final.png"));
        assert_eq!(result.adapted_reference_path(), Some("/out/adapted.png"));
        assert_eq!(result.retry_count, Some(1));
        let checks = result.validation_results.unwrap();
        assert_eq!(checks["pose_match"].score, 0.92);
        assert!(checks["pose_match"].success);
    }

    #[test]
    fn test_validation_keys_keep_response_order() {
        let body = r#"{"validation_results": {
            "zeta": {"success": true, "score": 1, "feedback": ""},
            "alpha": {"success": false, "score": 0.1, "feedback": "bad"},
            "mid": {"success": true, "score": 0.5, "feedback": "meh"}
        }}"#;
        let result: ProcessingResult = serde_json::from_str(body).unwrap();
        let keys: Vec<&String> = result.validation_results.as_ref().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_nulls_and_unknown_fields_are_tolerated() {
        let body = r#"{"generated_image_path": null, "intermediate_files": {}, "extra": [1, 2]}"#;
        let result: ProcessingResult = serde_json::from_str(body).unwrap();
        assert!(result.generated_image_path.is_none());
        assert!(result.adapted_reference_path().is_none());
    }

    #[test]
    fn test_partial_validation_entry_defaults() {
        let body = r#"{"validation_results": {"lighting": {"score": 0.4}}}"#;
        let result: ProcessingResult = serde_json::from_str(body).unwrap();
        let lighting = &result.validation_results.unwrap()["lighting"];
        assert!(!lighting.success);
        assert_eq!(lighting.feedback, "");
    }

    #[test]
    fn test_off_type_fields_do_not_sink_the_result() {
        let body = br#"{
            "status": 200,
            "generated_image_path": "/out/final.png",
            "retry_count": "twice",
            "intermediate_files": ["not", "an", "object"]
        }"#;
        let result = ProcessingResult::from_slice(body).unwrap();
        assert_eq!(result.generated_image_path.as_deref(), Some("/out/final.png"));
        assert!(result.status.is_none());
        assert!(result.retry_count.is_none());
        assert!(result.intermediate_files.is_none());
    }

    #[test]
    fn test_negative_retry_count_is_kept() {
        let body = br#"{"generated_image_path": "/out/final.png", "retry_count": -1}"#;
        let result = ProcessingResult::from_slice(body).unwrap();
        assert_eq!(result.retry_count, Some(-1));
        assert_eq!(result.generated_image_path.as_deref(), Some("/out/final.png"));
    }

    #[test]
    fn test_null_score_and_feedback_default() {
        let body = br#"{"validation_results": {
            "pose": {"success": true, "score": null, "feedback": null},
            "style": {"success": "yes", "score": "0.8", "feedback": 3},
            "broken": 7
        }}"#;
        let result = ProcessingResult::from_slice(body).unwrap();
        let checks = result.validation_results.unwrap();
        let keys: Vec<&String> = checks.keys().collect();
        assert_eq!(keys, vec!["pose", "style"]);

        assert!(checks["pose"].success);
        assert_eq!(checks["pose"].score, 0.0);
        assert_eq!(checks["pose"].feedback, "");

        assert!(!checks["style"].success);
        assert_eq!(checks["style"].score, 0.0);
        assert_eq!(checks["style"].feedback, "");
    }

    #[test]
    fn test_validation_of_wrong_shape_is_absent() {
        let result = ProcessingResult::from_slice(br#"{"validation_results": [1, 2]}"#).unwrap();
        assert!(result.validation_results.is_none());
    }

    #[test]
    fn test_non_object_json_is_an_empty_success() {
        assert_eq!(
            ProcessingResult::from_slice(b"[1, 2, 3]").unwrap(),
            ProcessingResult::default()
        );
        assert_eq!(
            ProcessingResult::from_slice(b"null").unwrap(),
            ProcessingResult::default()
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ProcessingResult::from_slice(b"<html>oops</html>").is_err());
    }
}
