//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Upload checks and PDF text extraction
//!   - Calling the MCQ generator (external provider with rule-based fallback)
//!   - Saving a generated batch as a quiz and shaping the response

use tracing::{error, info, instrument};

use crate::domain::{Generation, Mcq};
use crate::error::{ApiError, McqError, UploadError};
use crate::protocol::GenerateOut;
use crate::state::AppState;
use crate::store::CreatedQuestion;
use crate::validate::{sanitize_creator_name, sanitize_quiz_title, validate_pdf_upload};

/// Sanitized quiz fields; present only when both title and creator were sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizFields {
  pub title: String,
  pub created_by: String,
}

/// Outcome of the optional quiz save that follows generation.
#[derive(Debug, Default)]
pub struct QuizOutcome {
  pub created: bool,
  pub quiz_id: Option<String>,
  pub created_questions: Option<Vec<CreatedQuestion>>,
  pub error: Option<String>,
}

/// Sanitize the optional quiz fields before any generation work. Empty
/// values count as absent; a present but invalid value rejects the request.
pub fn quiz_fields(title: Option<&str>, created_by: Option<&str>) -> Result<Option<QuizFields>, UploadError> {
  let title = title.filter(|t| !t.is_empty()).map(sanitize_quiz_title).transpose()?;
  let created_by = created_by.filter(|c| !c.is_empty()).map(sanitize_creator_name).transpose()?;
  Ok(match (title, created_by) {
    (Some(title), Some(created_by)) => Some(QuizFields { title, created_by }),
    _ => None,
  })
}

#[instrument(level = "info", skip(state, bytes), fields(bytes = bytes.len()))]
pub async fn generate_from_pdf(state: &AppState, bytes: &[u8], filename: &str, num_questions: i64) -> Result<Generation, ApiError> {
  validate_pdf_upload(bytes, filename, state.config.max_upload_mb)?;
  let text = state.extractor.extract(bytes).map_err(McqError::from)?;
  info!(target: "quizgen_backend", %filename, chars = text.chars().count(), "PDF text extracted");
  generate_from_text(state, &text, num_questions).await
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn generate_from_text(state: &AppState, text: &str, num_questions: i64) -> Result<Generation, ApiError> {
  Ok(state.generator.generate(text, num_questions).await?)
}

/// Save `mcqs` as a quiz. A store failure is reported in the outcome, never raised.
#[instrument(level = "info", skip(state, quiz, mcqs), fields(count = mcqs.len()))]
pub async fn save_quiz(state: &AppState, quiz: &QuizFields, mcqs: &[Mcq]) -> QuizOutcome {
  match state.store.save_generated_quiz(&quiz.title, &quiz.created_by, mcqs).await {
    Ok(saved) => QuizOutcome {
      created: true,
      quiz_id: Some(saved.quiz_id),
      created_questions: Some(saved.questions),
      error: None,
    },
    Err(e) => {
      error!(target: "quizgen_backend", error = %e, "Error creating quiz");
      QuizOutcome {
        error: Some(format!("MCQs generated but quiz creation failed: {e}")),
        ..Default::default()
      }
    }
  }
}

pub fn to_out(generation: Generation, quiz: Option<QuizOutcome>) -> GenerateOut {
  let n = generation.mcqs.len();
  let message = match &quiz {
    Some(q) if q.created => format!("Successfully generated {n} MCQs and created quiz"),
    Some(_) => format!("Generated {n} MCQs but failed to create quiz"),
    None => format!("Successfully generated {n} MCQs"),
  };
  let mut out = GenerateOut {
    message,
    num_questions: n,
    source: generation.source.as_str(),
    questions: generation.mcqs,
    quiz_created: None,
    quiz_id: None,
    created_questions: None,
    error: None,
  };
  if let Some(q) = quiz {
    out.quiz_created = Some(q.created);
    out.quiz_id = q.quiz_id;
    out.created_questions = q.created_questions;
    out.error = q.error;
  }
  out
}
