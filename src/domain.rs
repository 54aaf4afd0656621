//! Domain models used by the generator: MCQs, answer options, providers and result origin.

use serde::{Deserialize, Serialize};

/// Every MCQ carries exactly this many options.
pub const ANSWERS_PER_MCQ: usize = 4;

/// Display cap for answer text built from source material.
pub const MAX_ANSWER_CHARS: usize = 100;

/// Bounds accepted for `num_questions`.
pub const MIN_QUESTIONS: i64 = 1;
pub const MAX_QUESTIONS: i64 = 50;

/// One selectable answer of an MCQ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
  pub answer_text: String,
  pub is_correct: bool,
}

impl AnswerOption {
  pub fn correct(text: impl Into<String>) -> Self {
    Self { answer_text: text.into(), is_correct: true }
  }

  pub fn wrong(text: impl Into<String>) -> Self {
    Self { answer_text: text.into(), is_correct: false }
  }
}

/// Multiple-choice question: prompt + 4 options, exactly one correct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
  pub question_text: String,
  pub answers: Vec<AnswerOption>,
}

impl Mcq {
  /// Checks the structural contract: non-empty prompt, 4 non-empty answers, one correct.
  pub fn is_well_formed(&self) -> bool {
    !self.question_text.trim().is_empty()
      && self.answers.len() == ANSWERS_PER_MCQ
      && self.answers.iter().all(|a| !a.answer_text.trim().is_empty())
      && self.answers.iter().filter(|a| a.is_correct).count() == 1
  }

  pub fn correct_answer(&self) -> Option<&AnswerOption> {
    self.answers.iter().find(|a| a.is_correct)
  }
}

/// Which strategy synthesizes MCQs for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
  /// OpenAI-compatible chat completion, parsed from `## MCQ n` blocks.
  External,
  /// Local segmentation + distractor algorithm; needs no network.
  #[default]
  RuleBased,
}

impl Provider {
  /// Map an `AI_PROVIDER` value onto a provider. Unknown values mean rule-based.
  pub fn from_setting(value: &str) -> Self {
    match value.trim().to_ascii_lowercase().as_str() {
      "external" | "openai" | "llm" | "groq" => Provider::External,
      _ => Provider::RuleBased,
    }
  }
}

/// Where did a returned batch come from?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McqSource {
  External,   // parsed from the external provider's text
  RuleBased,  // local generator
  Placeholder, // the single "main topic" item (last resort)
}

impl McqSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      McqSource::External => "external",
      McqSource::RuleBased => "rule_based",
      McqSource::Placeholder => "placeholder",
    }
  }
}

/// A generated batch plus its origin, for logging and response metadata.
#[derive(Clone, Debug)]
pub struct Generation {
  pub mcqs: Vec<Mcq>,
  pub source: McqSource,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn provider_setting_is_case_insensitive() {
    assert_eq!(Provider::from_setting("OpenAI"), Provider::External);
    assert_eq!(Provider::from_setting(" groq "), Provider::External);
    assert_eq!(Provider::from_setting("simple"), Provider::RuleBased);
    assert_eq!(Provider::from_setting(""), Provider::RuleBased);
  }

  #[test]
  fn well_formed_requires_single_correct_answer() {
    let mut mcq = Mcq {
      question_text: "Which?".into(),
      answers: vec![
        AnswerOption::correct("a"),
        AnswerOption::wrong("b"),
        AnswerOption::wrong("c"),
        AnswerOption::wrong("d"),
      ],
    };
    assert!(mcq.is_well_formed());
    mcq.answers[1].is_correct = true;
    assert!(!mcq.is_well_formed());
    mcq.answers.pop();
    assert!(!mcq.is_well_formed());
  }
}
