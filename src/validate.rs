//! Upload and form-field validation for the HTTP layer.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::UploadError;
use crate::util::escape_html;

const PDF_MAGIC: &[u8] = b"%PDF";
const MIN_PDF_BYTES: usize = 8;
const MAX_TITLE_CHARS: usize = 200;
const MIN_TITLE_CHARS: usize = 3;
const MAX_CREATOR_CHARS: usize = 100;
const MIN_CREATOR_CHARS: usize = 2;

fn creator_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\s.,\-_]+$").expect("valid creator regex"))
}

/// Cheap structural checks before the bytes reach the extractor.
pub fn validate_pdf_upload(bytes: &[u8], filename: &str, max_mb: usize) -> Result<(), UploadError> {
  if !filename.to_ascii_lowercase().ends_with(".pdf") {
    return Err(UploadError::NotPdf);
  }
  if bytes.is_empty() {
    return Err(UploadError::Empty);
  }
  if bytes.len() > max_mb.saturating_mul(1024 * 1024) {
    return Err(UploadError::TooLarge(max_mb));
  }
  if !bytes.starts_with(PDF_MAGIC) {
    return Err(UploadError::BadMagic);
  }
  if bytes.len() < MIN_PDF_BYTES {
    return Err(UploadError::TooSmall);
  }
  Ok(())
}

/// Trim, HTML-escape, then cut to `max_chars`.
fn sanitize_string(raw: &str, max_chars: usize) -> String {
  escape_html(raw.trim()).chars().take(max_chars).collect()
}

/// Overlong titles are cut to 200 chars; fewer than 3 chars is an error.
pub fn sanitize_quiz_title(raw: &str) -> Result<String, UploadError> {
  let title = sanitize_string(raw, MAX_TITLE_CHARS);
  if title.trim().chars().count() < MIN_TITLE_CHARS {
    return Err(UploadError::InvalidField {
      field: "quiz_title",
      reason: format!("must be at least {MIN_TITLE_CHARS} characters long"),
    });
  }
  Ok(title)
}

/// Overlong names are cut to 100 chars; the charset is then checked.
pub fn sanitize_creator_name(raw: &str) -> Result<String, UploadError> {
  let name = sanitize_string(raw, MAX_CREATOR_CHARS);
  if name.trim().chars().count() < MIN_CREATOR_CHARS {
    return Err(UploadError::InvalidField {
      field: "created_by",
      reason: format!("must be at least {MIN_CREATOR_CHARS} characters long"),
    });
  }
  if !creator_re().is_match(&name) {
    return Err(UploadError::InvalidField {
      field: "created_by",
      reason: "contains invalid characters".into(),
    });
  }
  Ok(name)
}
