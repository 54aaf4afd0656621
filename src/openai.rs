//! Minimal OpenAI-compatible client for MCQ generation.
//!
//! We only call chat.completions and request plain text in the `## MCQ n` block format.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::completer::Completer;
use crate::config::AppConfig;
use crate::error::ProviderError;

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
// Roughly one block per 160 tokens, plus headroom.
const TOKENS_PER_QUESTION: u32 = 160;
const BASE_TOKENS: u32 = 256;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub system_prompt: String,
}

impl OpenAI {
  /// Construct the client if OPENAI_API_KEY was configured; otherwise return None.
  /// The HTTP timeout matches the orchestrator's provider timeout.
  pub fn from_config(cfg: &AppConfig) -> Option<Self> {
    let settings = cfg.openai.as_ref()?;
    let client = match reqwest::Client::builder().timeout(cfg.provider_timeout).build() {
      Ok(c) => c,
      Err(e) => {
        error!(target: "quizgen_backend", error = %e, "Failed to build OpenAI HTTP client");
        return None;
      }
    };

    Some(Self {
      client,
      api_key: settings.api_key.clone(),
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      model: settings.model.clone(),
      system_prompt: cfg.prompts.mcq_system.clone(),
    })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, user_len = user.len()))]
  async fn chat_plain(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, ProviderError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = build_request(&self.model, system, user, max_tokens);

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(ProviderError::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default()
      .trim()
      .to_string();

    if text.is_empty() {
      return Err(ProviderError::EmptyContent);
    }
    Ok(text)
  }
}

#[async_trait]
impl Completer for OpenAI {
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str, num_questions: usize) -> Result<String, ProviderError> {
    let max_tokens = BASE_TOKENS + TOKENS_PER_QUESTION * num_questions as u32;
    let start = Instant::now();
    let result = self.chat_plain(&self.system_prompt, prompt, max_tokens).await;
    let elapsed: Duration = start.elapsed();
    match &result {
      Ok(text) => info!(?elapsed, response_len = text.len(), "Model response received"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during MCQ generation"),
    }
    result
  }

  fn name(&self) -> &str {
    &self.model
  }
}

fn build_request(model: &str, system: &str, user: &str, max_tokens: u32) -> ChatCompletionRequest {
  ChatCompletionRequest {
    model: model.to_string(),
    messages: vec![
      ChatMessageReq { role: "system".into(), content: system.into() },
      ChatMessageReq { role: "user".into(), content: user.into() },
    ],
    temperature: TEMPERATURE,
    top_p: Some(TOP_P),
    max_tokens: Some(max_tokens),
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  top_p: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::OpenAiSettings;

  #[test]
  fn error_body_message_is_extracted() {
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Incorrect API key provided"));
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }

  #[test]
  fn request_serializes_sampling_params() {
    let req = build_request("gpt-4o-mini", "sys", "user", 512);
    let v = serde_json::to_value(&req).expect("serializable");
    assert_eq!(v["model"], "gpt-4o-mini");
    assert_eq!(v["messages"][0]["role"], "system");
    assert_eq!(v["messages"][1]["content"], "user");
    assert_eq!(v["max_tokens"], 512);
    assert!(v["top_p"].as_f64().is_some());
  }

  #[test]
  fn response_content_is_read_from_first_choice() {
    let body = r###"{"choices":[{"message":{"content":"## MCQ 1"}}],"usage":{"total_tokens":12}}"###;
    let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("valid body");
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("## MCQ 1"));
  }

  #[test]
  fn client_requires_an_api_key() {
    let mut cfg = AppConfig::default();
    assert!(OpenAI::from_config(&cfg).is_none());
    cfg.openai = Some(OpenAiSettings {
      api_key: "sk-test".into(),
      base_url: "http://localhost:9/v1/".into(),
      model: "test-model".into(),
    });
    let client = OpenAI::from_config(&cfg).expect("client");
    assert_eq!(client.base_url, "http://localhost:9/v1");
    assert_eq!(client.name(), "test-model");
  }
}
