//! Runtime configuration: environment variables plus an optional TOML prompt file.
//!
//! Environment:
//!   PORT                       : u16 (default 3000)
//!   AI_PROVIDER                : "openai" / "llm" / "external" → external provider, else rule-based
//!   OPENAI_API_KEY             : enables the external client if present
//!   OPENAI_BASE_URL            : default "https://api.openai.com/v1"
//!   OPENAI_MODEL               : default "gpt-4o-mini"
//!   MCQ_PROVIDER_TIMEOUT_SECS  : default 30
//!   MCQ_MAX_CONTEXT_CHARS      : default 12000
//!   MAX_UPLOAD_MB              : default 10
//!   MCQ_CONFIG_PATH            : TOML with a `[prompts]` table (see `Prompts`)

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Provider;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FileConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts sent to the external provider. `{num_questions}` and `{context}`
/// are filled per request.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub mcq_system: String,
  pub mcq_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      mcq_system: "You are an expert educator writing multiple-choice questions. Follow the output format exactly.".into(),
      mcq_user_template: r#"Generate {num_questions} UNIQUE multiple-choice questions about the text below.

IMPORTANT:
- Each question must be DIFFERENT and cover different aspects
- Vary question types (what, how, why, which, etc.)
- Cover different topics from the text
- Avoid repetition

Text:
{context}

Use exactly this format for every question, numbering the blocks 1..{num_questions}:

## MCQ 1
Question: [question]
A) [option A]
B) [option B]
C) [option C]
D) [option D]
Correct Answer: [letter of the correct option]
"#
      .into(),
    }
  }
}

/// Settings for the external OpenAI-compatible client.
#[derive(Clone, Debug)]
pub struct OpenAiSettings {
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
  pub port: u16,
  pub provider: Provider,
  pub openai: Option<OpenAiSettings>,
  pub provider_timeout: Duration,
  pub max_context_chars: usize,
  pub max_upload_mb: usize,
  pub prompts: Prompts,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      provider: Provider::RuleBased,
      openai: None,
      provider_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
      max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
      prompts: Prompts::default(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Self {
    let default = Self::default();
    let openai = std::env::var("OPENAI_API_KEY")
      .ok()
      .filter(|k| !k.trim().is_empty())
      .map(|api_key| OpenAiSettings {
        api_key,
        base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into()),
        model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
      });

    Self {
      port: env_parse("PORT").unwrap_or(default.port),
      provider: std::env::var("AI_PROVIDER")
        .map(|v| Provider::from_setting(&v))
        .unwrap_or(default.provider),
      openai,
      provider_timeout: env_parse("MCQ_PROVIDER_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(default.provider_timeout),
      max_context_chars: env_parse("MCQ_MAX_CONTEXT_CHARS").unwrap_or(default.max_context_chars),
      max_upload_mb: env_parse("MAX_UPLOAD_MB").unwrap_or(default.max_upload_mb),
      prompts: load_file_config_from_env().map(|c| c.prompts).unwrap_or_default(),
    }
  }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
  std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse a TOML config document.
pub fn parse_file_config(src: &str) -> Result<FileConfig, toml::de::Error> {
  toml::from_str::<FileConfig>(src)
}

/// Attempt to load `FileConfig` from MCQ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_file_config_from_env() -> Option<FileConfig> {
  let path = std::env::var("MCQ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_file_config(&s) {
      Ok(cfg) => {
        info!(target: "quizgen_backend", %path, "Loaded MCQ config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizgen_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizgen_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
