//! PDF text extraction. Only the concatenated page text is needed downstream.

use lopdf::Document;
use tracing::{debug, instrument, warn};

use crate::error::ExtractionError;

pub trait PdfExtractor: Send + Sync {
  fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Pure-Rust extractor backed by lopdf.
#[derive(Clone, Copy, Debug, Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
  #[instrument(level = "info", skip(self, bytes), fields(bytes = bytes.len()))]
  fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    let pages = doc.get_pages();

    let mut text = String::new();
    for page_num in pages.keys() {
      match doc.extract_text(&[*page_num]) {
        Ok(page_text) => {
          text.push_str(&page_text);
          text.push('\n');
        }
        // One bad page should not sink the document.
        Err(e) => warn!(target: "quizgen_backend", page = *page_num, error = %e, "Skipping unreadable page"),
      }
    }

    let text = text.trim().to_string();
    debug!(target: "quizgen_backend", pages = pages.len(), chars = text.chars().count(), "Extracted PDF text");
    if text.is_empty() {
      return Err(ExtractionError::NoText);
    }
    Ok(text)
  }
}
