//! Rule-based MCQ synthesis. Runs entirely in memory and never fails.
//!
//! Per question:
//!   1) pick an unused content unit (> 30 chars) at random
//!   2) pick a key term from it (capitalized word or lowercase word of 4+ letters)
//!   3) correct answer = the unit, distractors = other unused units
//!   4) shuffle the four answers
//! If units run out before the quota, capitalized phrases from the whole text
//! fill the remainder with generic questions. An empty result becomes the
//! single placeholder MCQ.

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::distractors::DistractorPool;
use crate::domain::{AnswerOption, Mcq, ANSWERS_PER_MCQ, MAX_ANSWER_CHARS};
use crate::segment::segment;
use crate::seeds::{phrase_mcq, placeholder_mcq, term_question, DEFAULT_KEY_TERM};
use crate::util::truncate_display;

/// Units at or below this many chars are never used as a question basis.
pub const MIN_BASIS_CHARS: usize = 30;

fn key_term_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\b[A-Z][a-z]+\b|\b[a-z]{4,}\b").expect("valid key term regex"))
}

fn phrase_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("valid phrase regex"))
}

/// Candidate focal terms of a unit, in order of appearance.
pub fn key_terms(unit: &str) -> Vec<&str> {
  key_term_re().find_iter(unit).map(|m| m.as_str()).collect()
}

/// Capitalized phrases ("Roman Empire", "Paris") in order of appearance.
pub fn capitalized_phrases(text: &str) -> Vec<&str> {
  phrase_re().find_iter(text).map(|m| m.as_str()).collect()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedGenerator;

impl RuleBasedGenerator {
  pub fn new() -> Self {
    Self
  }

  /// At most `num_questions` MCQs from `text`; never empty.
  #[instrument(level = "debug", skip(self, text, rng), fields(text_len = text.len()))]
  pub fn generate<R: Rng + ?Sized>(&self, text: &str, num_questions: usize, rng: &mut R) -> Vec<Mcq> {
    let units = segment(text, num_questions);
    let mut pool = DistractorPool::new(&units);
    let mut questions: Vec<Mcq> = Vec::with_capacity(num_questions);

    for _ in 0..num_questions.min(units.len()) {
      let available = pool.available(MIN_BASIS_CHARS);
      let Some(&basis) = available.choose(rng) else {
        debug!(target: "mcq", built = questions.len(), "No unused content units left");
        break;
      };
      pool.mark_used(basis);
      questions.push(self.unit_mcq(basis, &pool, rng));
    }

    if questions.len() < num_questions {
      let phrases = capitalized_phrases(text);
      if !phrases.is_empty() {
        debug!(target: "mcq", missing = num_questions - questions.len(), phrases = phrases.len(), "Filling quota with phrase questions");
      }
      while questions.len() < num_questions {
        let Some(phrase) = phrases.choose(rng) else { break };
        questions.push(phrase_mcq(phrase, rng));
      }
    }

    questions.truncate(num_questions);
    if questions.is_empty() {
      warn!(target: "mcq", text_len = text.len(), "Rule-based generator produced nothing; using placeholder");
      return vec![placeholder_mcq()];
    }
    questions
  }

  fn unit_mcq<R: Rng + ?Sized>(&self, basis: &str, pool: &DistractorPool<'_>, rng: &mut R) -> Mcq {
    let term = key_terms(basis).choose(rng).copied().unwrap_or(DEFAULT_KEY_TERM);

    let mut answers = Vec::with_capacity(ANSWERS_PER_MCQ);
    answers.push(AnswerOption::correct(truncate_display(basis, MAX_ANSWER_CHARS)));
    answers.extend(
      pool
        .pick_distractors(ANSWERS_PER_MCQ - 1, basis, rng)
        .into_iter()
        .map(AnswerOption::wrong),
    );
    answers.shuffle(rng);

    Mcq { question_text: term_question(term), answers }
  }
}
