//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::Mcq;
use crate::store::CreatedQuestion;

pub const DEFAULT_NUM_QUESTIONS: i64 = 5;

fn default_num_questions() -> i64 {
    DEFAULT_NUM_QUESTIONS
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// Body of `POST /api/v1/mcq/from-text`.
#[derive(Debug, Deserialize)]
pub struct FromTextIn {
    pub text: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: i64,
}

/// Multipart fields of the upload endpoints, after reading.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<(String, Vec<u8>)>,
    pub num_questions: Option<i64>,
    pub quiz_title: Option<String>,
    pub created_by: Option<String>,
}

/// Response of every generation endpoint. Quiz fields appear only when a
/// save was attempted.
#[derive(Debug, Serialize)]
pub struct GenerateOut {
    pub message: String,
    pub num_questions: usize,
    pub source: &'static str,
    pub questions: Vec<Mcq>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_questions: Option<Vec<CreatedQuestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_defaults_question_count() {
        let body: FromTextIn = serde_json::from_str(r#"{"text":"abc"}"#).expect("valid json");
        assert_eq!(body.num_questions, DEFAULT_NUM_QUESTIONS);
    }

    #[test]
    fn quiz_fields_are_omitted_when_unset() {
        let out = GenerateOut {
            message: "ok".into(),
            num_questions: 0,
            source: "rule_based",
            questions: vec![],
            quiz_created: None,
            quiz_id: None,
            created_questions: None,
            error: None,
        };
        let v = serde_json::to_value(&out).expect("serializable");
        assert!(v.get("quiz_created").is_none());
        assert!(v.get("error").is_none());
        assert_eq!(v["num_questions"], 0);
    }
}
