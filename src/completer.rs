//! Capability seam for the external MCQ provider.
//!
//! The orchestrator only sees `dyn Completer`, so the rule-based path and the
//! tests never depend on network reachability.

use async_trait::async_trait;

use crate::error::ProviderError;

#[async_trait]
pub trait Completer: Send + Sync {
  /// Send `prompt` (already filled with the source text) and return the raw reply.
  async fn complete(&self, prompt: &str, num_questions: usize) -> Result<String, ProviderError>;

  /// Short label for logs.
  fn name(&self) -> &str;
}
