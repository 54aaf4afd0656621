//! Parser for the provider's `## MCQ n` text blocks.
//!
//! Expected block shape:
//! ```text
//! ## MCQ 1
//! Question: What powers the cell?
//! A) Ribosomes
//! B) Mitochondria
//! C) Vacuoles
//! D) Golgi bodies
//! Correct Answer: B
//! ```
//! Best effort: a block missing any piece is dropped and parsing moves on.
//! An empty result is the caller's signal that the output was unusable.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{AnswerOption, Mcq, ANSWERS_PER_MCQ};

const LETTERS: [char; ANSWERS_PER_MCQ] = ['A', 'B', 'C', 'D'];

/// Blocks shorter than this (question + 4 options + answer) cannot be complete.
const MIN_BLOCK_LINES: usize = 6;

fn block_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"##\s*MCQ\s*\d+").expect("valid block regex"))
}

fn option_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^([A-D])\)\s*(.*)$").expect("valid option regex"))
}

// Both "Correct Answer: B" and "Correct Answer: B) Mitochondria" show up in
// provider output; try them in order.
fn correct_res() -> &'static [Regex; 2] {
  static RES: OnceLock<[Regex; 2]> = OnceLock::new();
  RES.get_or_init(|| {
    [
      Regex::new(r"Correct Answer:\s*([A-D])\b").expect("valid answer regex"),
      Regex::new(r"Correct Answer:\s*([A-D])\)").expect("valid answer regex"),
    ]
  })
}

/// Parse every valid block of `raw` into an MCQ, options in A–D order.
pub fn parse(raw: &str) -> Vec<Mcq> {
  let mut out = Vec::new();
  let mut discarded = 0usize;
  for block in block_re().split(raw.trim()) {
    if block.trim().is_empty() {
      continue;
    }
    match parse_block(block) {
      Some(mcq) => out.push(mcq),
      None => discarded += 1,
    }
  }
  debug!(target: "mcq", parsed = out.len(), discarded, "Parsed provider output");
  out
}

/// One block → one MCQ, or `None` when any required piece is missing.
pub fn parse_block(block: &str) -> Option<Mcq> {
  let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
  if lines.len() < MIN_BLOCK_LINES {
    return None;
  }

  let mut question = String::new();
  let mut options: BTreeMap<char, String> = BTreeMap::new();
  let mut correct: Option<char> = None;

  for line in lines {
    if let Some(rest) = line.strip_prefix("Question:") {
      question = rest.trim().to_string();
    } else if let Some(caps) = option_re().captures(line) {
      let letter = caps[1].chars().next()?;
      let text = caps[2].trim();
      if !text.is_empty() {
        options.insert(letter, text.to_string());
      }
    } else if line.starts_with("Correct Answer:") {
      correct = correct_letter(line);
    }
  }

  let correct = correct?;
  if question.is_empty() || options.len() != ANSWERS_PER_MCQ {
    return None;
  }

  let answers = LETTERS
    .iter()
    .map(|letter| AnswerOption {
      answer_text: options.get(letter).cloned().unwrap_or_default(),
      is_correct: *letter == correct,
    })
    .collect();

  Some(Mcq { question_text: question, answers })
}

fn correct_letter(line: &str) -> Option<char> {
  correct_res()
    .iter()
    .find_map(|re| re.captures(line))
    .and_then(|caps| caps[1].chars().next())
}
