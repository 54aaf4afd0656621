//! Built-in fallback content: generic answers and the last-resort placeholder MCQ.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerOption, Mcq};

/// Used when no key term can be found in the chosen unit.
pub const DEFAULT_KEY_TERM: &str = "concept";

/// Fixed answers for capitalized-phrase questions (first one is correct).
const PHRASE_ANSWERS: [&str; 4] = [
  "A key concept mentioned in the text",
  "Not mentioned in the text",
  "A different topic",
  "Unrelated information",
];

pub fn term_question(term: &str) -> String {
  format!("What is mentioned about '{}' in the text?", term)
}

pub fn phrase_question(phrase: &str) -> String {
  format!("According to the text, what is '{}'?", phrase)
}

/// Generic MCQ about a capitalized phrase, answers shuffled.
pub fn phrase_mcq<R: Rng + ?Sized>(phrase: &str, rng: &mut R) -> Mcq {
  let mut answers: Vec<AnswerOption> = PHRASE_ANSWERS
    .iter()
    .enumerate()
    .map(|(i, text)| if i == 0 { AnswerOption::correct(*text) } else { AnswerOption::wrong(*text) })
    .collect();
  answers.shuffle(rng);
  Mcq { question_text: phrase_question(phrase), answers }
}

/// Absolute last-resort fallback: callers always get at least this one item.
pub fn placeholder_mcq() -> Mcq {
  Mcq {
    question_text: "What is the main topic of this text?".into(),
    answers: vec![
      AnswerOption::correct("The content discussed in the uploaded document"),
      AnswerOption::wrong("An unrelated topic"),
      AnswerOption::wrong("A different subject"),
      AnswerOption::wrong("Something else"),
    ],
  }
}
