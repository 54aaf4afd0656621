//! Generation orchestrator: provider selection and the fallback chain.
//!
//! ```text
//! ExternalAttempt ──ok, ≥1 parsed──▶ Done
//!       │ error / timeout / nothing parsed
//!       ▼
//! FallbackAttempt ─────────────────▶ Done   (rule-based, cannot fail)
//! ```
//! With the rule-based provider, or no client handle, we start at
//! `FallbackAttempt`. Only input validation can make `generate_mcqs` fail.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info, instrument, warn};

use crate::completer::Completer;
use crate::config::{AppConfig, Prompts};
use crate::domain::{Generation, McqSource, Mcq, Provider, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::error::{McqError, ProviderError};
use crate::parser;
use crate::rules::RuleBasedGenerator;
use crate::seeds::placeholder_mcq;
use crate::util::{fill_template, trunc_for_log, truncate_display};

/// Reject counts outside [1, 50] and blank text.
pub fn validate_request(text: &str, num_questions: i64) -> Result<usize, McqError> {
  if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&num_questions) {
    return Err(McqError::InvalidQuestionCount { got: num_questions });
  }
  if text.trim().is_empty() {
    return Err(McqError::EmptyText);
  }
  Ok(num_questions as usize)
}

enum Phase {
  ExternalAttempt(Arc<dyn Completer>),
  FallbackAttempt,
  Done(Generation),
}

#[derive(Clone)]
pub struct McqGenerator {
  provider: Provider,
  completer: Option<Arc<dyn Completer>>,
  rules: RuleBasedGenerator,
  prompts: Prompts,
  timeout: Duration,
  max_context_chars: usize,
}

impl McqGenerator {
  pub fn new(cfg: &AppConfig, completer: Option<Arc<dyn Completer>>) -> Self {
    Self {
      provider: cfg.provider,
      completer,
      rules: RuleBasedGenerator::new(),
      prompts: cfg.prompts.clone(),
      timeout: cfg.provider_timeout,
      max_context_chars: cfg.max_context_chars,
    }
  }

  /// Rule-based only; never touches the network.
  pub fn rule_based() -> Self {
    Self::new(&AppConfig::default(), None)
  }

  pub fn provider(&self) -> Provider {
    self.provider
  }

  pub fn has_completer(&self) -> bool {
    self.completer.is_some()
  }

  /// Validate, then generate with a fresh entropy-seeded RNG.
  pub async fn generate_mcqs(&self, text: &str, num_questions: usize) -> Result<Vec<Mcq>, McqError> {
    self.generate(text, num_questions as i64).await.map(|g| g.mcqs)
  }

  /// Like `generate_mcqs`, but also reports where the batch came from.
  pub async fn generate(&self, text: &str, num_questions: i64) -> Result<Generation, McqError> {
    let n = validate_request(text, num_questions)?;
    let mut rng = StdRng::from_entropy();
    Ok(self.run(text, n, &mut rng).await)
  }

  /// Drive the fallback chain with an injected RNG. Never fails.
  #[instrument(level = "info", skip(self, text, rng), fields(text_len = text.len(), provider = ?self.provider))]
  pub async fn run<R: Rng + Send + ?Sized>(&self, text: &str, num_questions: usize, rng: &mut R) -> Generation {
    let mut phase = self.initial_phase();
    loop {
      phase = match phase {
        Phase::ExternalAttempt(completer) => match self.try_external(completer.as_ref(), text, num_questions).await {
          Ok(mcqs) => {
            info!(target: "mcq", count = mcqs.len(), provider = completer.name(), "External provider produced MCQs");
            Phase::Done(Generation { mcqs, source: McqSource::External })
          }
          Err(e) => {
            error!(target: "mcq", error = %e, provider = completer.name(), "External provider failed");
            warn!(target: "mcq", "Falling back to rule-based generator");
            Phase::FallbackAttempt
          }
        },
        Phase::FallbackAttempt => Phase::Done(self.fallback(text, num_questions, rng)),
        Phase::Done(generation) => {
          info!(target: "mcq", count = generation.mcqs.len(), source = generation.source.as_str(), "MCQ batch ready");
          return generation;
        }
      };
    }
  }

  fn initial_phase(&self) -> Phase {
    match (self.provider, &self.completer) {
      (Provider::External, Some(c)) => Phase::ExternalAttempt(Arc::clone(c)),
      (Provider::External, None) => {
        warn!(target: "mcq", "External provider selected but no client configured; using rule-based generator");
        Phase::FallbackAttempt
      }
      (Provider::RuleBased, _) => Phase::FallbackAttempt,
    }
  }

  fn build_prompt(&self, text: &str, num_questions: usize) -> String {
    let context = truncate_display(text, self.max_context_chars);
    let n = num_questions.to_string();
    fill_template(&self.prompts.mcq_user_template, &[("num_questions", n.as_str()), ("context", context.as_str())])
  }

  async fn try_external(&self, completer: &dyn Completer, text: &str, num_questions: usize) -> Result<Vec<Mcq>, ProviderError> {
    let prompt = self.build_prompt(text, num_questions);
    let raw = match tokio::time::timeout(self.timeout, completer.complete(&prompt, num_questions)).await {
      Ok(result) => result?,
      Err(_) => return Err(ProviderError::Timeout(self.timeout.as_secs())),
    };
    info!(target: "mcq", raw = %trunc_for_log(&raw, 400), "Provider raw output");

    let mut mcqs = parser::parse(&raw);
    if mcqs.is_empty() {
      return Err(ProviderError::Unparsable);
    }
    mcqs.truncate(num_questions);
    Ok(mcqs)
  }

  fn fallback<R: Rng + ?Sized>(&self, text: &str, num_questions: usize, rng: &mut R) -> Generation {
    let mcqs = self.rules.generate(text, num_questions, rng);
    let source = if mcqs.len() == 1 && mcqs[0] == placeholder_mcq() {
      McqSource::Placeholder
    } else {
      McqSource::RuleBased
    };
    Generation { mcqs, source }
  }
}
