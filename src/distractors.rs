//! Distractor pool: wrong-answer candidates drawn from unused content units.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::MAX_ANSWER_CHARS;
use crate::util::truncate_display;

/// Tracks which units became correct answers and hands out the rest as distractors.
#[derive(Debug)]
pub struct DistractorPool<'a> {
  units: &'a [String],
  used: HashSet<&'a str>,
}

impl<'a> DistractorPool<'a> {
  pub fn new(units: &'a [String]) -> Self {
    Self { units, used: HashSet::new() }
  }

  /// Record `unit` as consumed by a correct answer.
  pub fn mark_used(&mut self, unit: &'a str) {
    self.used.insert(unit);
  }

  pub fn is_used(&self, unit: &str) -> bool {
    self.used.contains(unit)
  }

  /// Units not yet used as a correct answer whose length exceeds `min_chars`.
  pub fn available(&self, min_chars: usize) -> Vec<&'a str> {
    self
      .units
      .iter()
      .map(String::as_str)
      .filter(|u| !self.used.contains(u) && u.chars().count() > min_chars)
      .collect()
  }

  /// Exactly `count` distractors for `correct_unit`, each distinct from it and
  /// from each other. Pads with `Option B`, `Option C`, ... once the pool runs dry.
  pub fn pick_distractors<R: Rng + ?Sized>(&self, count: usize, correct_unit: &str, rng: &mut R) -> Vec<String> {
    let correct_text = truncate_display(correct_unit, MAX_ANSWER_CHARS);
    let mut candidates: Vec<&str> = self
      .units
      .iter()
      .map(String::as_str)
      .filter(|u| *u != correct_unit && !self.used.contains(u))
      .collect();
    candidates.shuffle(rng);

    let mut picked: Vec<String> = Vec::with_capacity(count);
    for unit in candidates {
      if picked.len() == count {
        break;
      }
      let text = truncate_display(unit, MAX_ANSWER_CHARS);
      // Two units can share their first 100 chars; keep displayed texts unique.
      if text != correct_text && !picked.contains(&text) {
        picked.push(text);
      }
    }

    let mut slot = picked.len();
    while picked.len() < count {
      picked.push(placeholder_option(slot));
      slot += 1;
    }
    picked
  }
}

/// `Option B` for slot 0, `Option C` for slot 1, and so on.
pub fn placeholder_option(slot: usize) -> String {
  let letter = (b'B' + (slot % 25) as u8) as char;
  if slot < 25 {
    format!("Option {}", letter)
  } else {
    format!("Option {}{}", letter, slot / 25)
  }
}
