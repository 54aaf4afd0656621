//! Error taxonomy for the generator and the HTTP layer.
//!
//! - `McqError` is what escapes `generate_mcqs`: bad input or a failed extraction.
//! - `ProviderError` never escapes; the orchestrator logs it and falls back.
//! - `ApiError` is the HTTP envelope (`{"detail": ...}`) built from the others.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

use crate::domain::{MAX_QUESTIONS, MIN_QUESTIONS};

/// PDF text extraction failures (upstream collaborator).
#[derive(Debug, Error)]
pub enum ExtractionError {
  #[error("Failed to read PDF document: {0}")]
  Unreadable(String),
  #[error("PDF file appears to be empty or unreadable")]
  NoText,
}

/// External provider failures. Recovered locally by the rule-based fallback.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("provider request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("provider HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("provider returned no content")]
  EmptyContent,
  #[error("provider call timed out after {0}s")]
  Timeout(u64),
  #[error("provider output contained no valid MCQ block")]
  Unparsable,
}

/// Errors surfaced to callers of the generator.
#[derive(Debug, Error)]
pub enum McqError {
  #[error("Number of questions must be between {min} and {max} (got {got})", min = MIN_QUESTIONS, max = MAX_QUESTIONS)]
  InvalidQuestionCount { got: i64 },
  #[error("Source text is empty")]
  EmptyText,
  #[error(transparent)]
  Extraction(#[from] ExtractionError),
}

/// Upload validation failures (file type, size, form fields).
#[derive(Debug, Error)]
pub enum UploadError {
  #[error("Only PDF files are supported")]
  NotPdf,
  #[error("File is empty")]
  Empty,
  #[error("File size exceeds maximum allowed size of {0}MB")]
  TooLarge(usize),
  #[error("Invalid PDF file format. File does not appear to be a valid PDF.")]
  BadMagic,
  #[error("File is too small to be a valid PDF")]
  TooSmall,
  #[error("Missing form field '{0}'")]
  MissingField(&'static str),
  #[error("Invalid form field '{field}': {reason}")]
  InvalidField { field: &'static str, reason: String },
}

/// Store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Unknown quiz: {0}")]
  UnknownQuiz(String),
  #[error("Unknown question: {0}")]
  UnknownQuestion(String),
}

/// Everything an HTTP handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Mcq(#[from] McqError),
  #[error(transparent)]
  Upload(#[from] UploadError),
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error("Invalid multipart body: {0}")]
  Multipart(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Mcq(McqError::Extraction(ExtractionError::Unreadable(_))) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Mcq(_) | ApiError::Upload(_) | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::NOT_FOUND,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    tracing::warn!(target: "quizgen_backend", status = status.as_u16(), error = %self, "Request rejected");
    (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_count_message_names_bounds() {
    let msg = McqError::InvalidQuestionCount { got: 51 }.to_string();
    assert!(msg.contains("between 1 and 50"), "{msg}");
    assert!(msg.contains("51"));
  }

  #[test]
  fn api_error_status_mapping() {
    assert_eq!(ApiError::from(McqError::EmptyText).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      ApiError::from(McqError::from(ExtractionError::Unreadable("bad xref".into()))).status(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(ApiError::from(McqError::from(ExtractionError::NoText)).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::from(StoreError::UnknownQuiz("x".into())).status(), StatusCode::NOT_FOUND);
  }
}
