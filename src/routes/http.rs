//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic request and result info.

use std::sync::Arc;
use axum::{extract::{Multipart, Path, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::{ApiError, UploadError};
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use crate::store::QuizView;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

/// Upload a PDF, generate MCQs and, when both `quiz_title` and `created_by`
/// are given, save them as a quiz.
#[instrument(level = "info", skip(state, multipart))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  multipart: Multipart,
) -> Result<Json<GenerateOut>, ApiError> {
  let form = read_upload_form(multipart).await?;
  let (filename, bytes) = form.file.ok_or(UploadError::MissingField("file"))?;
  let n = form.num_questions.unwrap_or(DEFAULT_NUM_QUESTIONS);
  let fields = quiz_fields(form.quiz_title.as_deref(), form.created_by.as_deref())?;

  let generation = generate_from_pdf(&state, &bytes, &filename, n).await?;
  let quiz = match &fields {
    Some(f) => Some(save_quiz(&state, f, &generation.mcqs).await),
    None => None,
  };
  info!(target: "mcq", %filename, count = generation.mcqs.len(), source = generation.source.as_str(), "HTTP generate served");
  Ok(Json(to_out(generation, quiz)))
}

#[instrument(level = "info", skip(state, multipart))]
pub async fn http_post_generate_only(
  State(state): State<Arc<AppState>>,
  multipart: Multipart,
) -> Result<Json<GenerateOut>, ApiError> {
  let form = read_upload_form(multipart).await?;
  let (filename, bytes) = form.file.ok_or(UploadError::MissingField("file"))?;
  let n = form.num_questions.unwrap_or(DEFAULT_NUM_QUESTIONS);

  let generation = generate_from_pdf(&state, &bytes, &filename, n).await?;
  info!(target: "mcq", %filename, count = generation.mcqs.len(), source = generation.source.as_str(), "HTTP generate-only served");
  Ok(Json(to_out(generation, None)))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), num_questions = body.num_questions))]
pub async fn http_post_from_text(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FromTextIn>,
) -> Result<Json<GenerateOut>, ApiError> {
  let generation = generate_from_text(&state, &body.text, body.num_questions).await?;
  Ok(Json(to_out(generation, None)))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuizView>, ApiError> {
  Ok(Json(state.store.get_quiz(&id).await?))
}

/// Drain the multipart body into an `UploadForm`. Unknown fields are ignored.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
  let mut form = UploadForm::default();
  while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::Multipart(e.to_string()))? {
    let name = field.name().unwrap_or_default().to_string();
    match name.as_str() {
      "file" => {
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::Multipart(e.to_string()))?;
        form.file = Some((filename, bytes.to_vec()));
      }
      "num_questions" => {
        let raw = field.text().await.map_err(|e| ApiError::Multipart(e.to_string()))?;
        let n = raw.trim().parse::<i64>().map_err(|_| UploadError::InvalidField {
          field: "num_questions",
          reason: format!("'{}' is not an integer", raw.trim()),
        })?;
        form.num_questions = Some(n);
      }
      "quiz_title" => form.quiz_title = Some(field.text().await.map_err(|e| ApiError::Multipart(e.to_string()))?),
      "created_by" => form.created_by = Some(field.text().await.map_err(|e| ApiError::Multipart(e.to_string()))?),
      _ => {}
    }
  }
  Ok(form)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::body::{to_bytes, Body};
  use axum::http::{header, Request, StatusCode};
  use tower::ServiceExt;

  use crate::config::AppConfig;
  use crate::error::ExtractionError;
  use crate::pdf::PdfExtractor;
  use crate::routes::build_router;

  const TEXT: &str = "Plate tectonics explains the movement of continents. \
    Earthquakes occur where plates grind past each other. \
    Volcanoes often form along subduction zones. \
    Mountain ranges rise where continental plates collide.";

  struct FixedText;

  impl PdfExtractor for FixedText {
    fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
      Ok(TEXT.to_string())
    }
  }

  fn app() -> axum::Router {
    let state = AppState::with_parts(AppConfig::default(), None, Arc::new(FixedText));
    build_router(Arc::new(state))
  }

  const BOUNDARY: &str = "XBOUNDARYX";

  fn multipart_body(filename: &str, file: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
      body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes());
    }
    body.extend_from_slice(
      format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  fn upload(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::post(uri)
      .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
      .body(Body::from(body))
      .expect("request")
  }

  async fn json(res: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
  }

  #[tokio::test]
  async fn health_is_ok() {
    let res = app().oneshot(Request::get("/api/v1/health").body(Body::empty()).expect("request")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await["ok"], true);
  }

  #[tokio::test]
  async fn from_text_returns_requested_count() {
    let req = Request::post("/api/v1/mcq/from-text")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(serde_json::json!({ "text": TEXT, "num_questions": 3 }).to_string()))
      .expect("request");
    let res = app().oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let v = json(res).await;
    assert_eq!(v["num_questions"], 3);
    assert_eq!(v["questions"].as_array().map(Vec::len), Some(3));
    assert_eq!(v["questions"][0]["answers"].as_array().map(Vec::len), Some(4));
    assert!(v.get("quiz_created").is_none());
  }

  #[tokio::test]
  async fn out_of_range_count_is_a_bad_request() {
    let req = Request::post("/api/v1/mcq/from-text")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(serde_json::json!({ "text": TEXT, "num_questions": 0 }).to_string()))
      .expect("request");
    let res = app().oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json(res).await["detail"].as_str().unwrap_or_default().contains("between 1 and 50"));
  }

  #[tokio::test]
  async fn non_pdf_upload_is_rejected() {
    let body = multipart_body("notes.txt", b"%PDF-1.4 fake", &[("num_questions", "2")]);
    let res = app().oneshot(upload("/api/v1/mcq/generate-only", body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "Only PDF files are supported");
  }

  #[tokio::test]
  async fn upload_with_title_creates_a_readable_quiz() {
    let app = app();
    let body = multipart_body("geo.pdf", b"%PDF-1.4 fake body", &[("num_questions", "2"), ("quiz_title", "Geology"), ("created_by", "Ms. Rivera")]);
    let res = app.clone().oneshot(upload("/api/v1/mcq/generate", body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let v = json(res).await;
    assert_eq!(v["quiz_created"], true);
    assert_eq!(v["created_questions"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["created_questions"][0]["question_text"], v["questions"][0]["question_text"]);
    let quiz_id = v["quiz_id"].as_str().unwrap_or_default().to_string();

    let res = app.oneshot(Request::get(format!("/api/v1/quizzes/{quiz_id}")).body(Body::empty()).expect("request")).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let quiz = json(res).await;
    assert_eq!(quiz["title"], "Geology");
    assert_eq!(quiz["questions"].as_array().map(Vec::len), Some(2));
  }

  #[tokio::test]
  async fn invalid_creator_is_a_bad_request() {
    let body = multipart_body("geo.pdf", b"%PDF-1.4 fake body", &[("quiz_title", "Geology"), ("created_by", "<script>")]);
    let res = app().oneshot(upload("/api/v1/mcq/generate", body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json(res).await["detail"].as_str().unwrap_or_default().contains("created_by"));
  }

  #[tokio::test]
  async fn title_without_creator_skips_the_quiz() {
    let body = multipart_body("geo.pdf", b"%PDF-1.4 fake body", &[("num_questions", "2"), ("quiz_title", "Geology")]);
    let res = app().oneshot(upload("/api/v1/mcq/generate", body)).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let v = json(res).await;
    assert_eq!(v["num_questions"], 2);
    assert!(v.get("quiz_created").is_none());
  }

  #[tokio::test]
  async fn unknown_quiz_is_not_found() {
    let res = app().oneshot(Request::get("/api/v1/quizzes/missing").body(Body::empty()).expect("request")).await.expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }
}
