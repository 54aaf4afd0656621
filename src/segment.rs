//! Text segmentation into content units (sentences → paragraphs → fixed windows).
//!
//! A content unit is the raw material for one question: the correct answer is cut
//! from it, and the other units serve as distractors. The fallback tiers
//! oversupply (up to `2 × target`) so distractors have something to draw from.

use std::collections::HashSet;

use tracing::debug;

/// Sentences at or below this many chars are noise.
pub const MIN_SENTENCE_CHARS: usize = 20;
/// Paragraphs and windows at or below this many chars are dropped.
pub const MIN_BLOCK_CHARS: usize = 50;
/// Width of the last-resort windows.
pub const WINDOW_CHARS: usize = 200;

/// Which tier produced the units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentTier {
  Sentences,
  Paragraphs,
  Windows,
}

#[derive(Clone, Debug)]
pub struct Segmentation {
  pub tier: SegmentTier,
  pub units: Vec<String>,
}

/// Split `text` into distinct content units. The paragraph and window
/// fallbacks return at most `2 × target_count` units.
pub fn segment(text: &str, target_count: usize) -> Vec<String> {
  segment_with_tier(text, target_count).units
}

pub fn segment_with_tier(text: &str, target_count: usize) -> Segmentation {
  let cap = target_count.saturating_mul(2);

  // Sentences are never capped: short ones may not qualify as a question
  // basis, so cutting them could starve the generator.
  let sentences = dedup(split_sentences(text));
  let (tier, units) = if sentences.len() >= target_count {
    (SegmentTier::Sentences, sentences)
  } else {
    let paragraphs = dedup(split_paragraphs(text));
    let (tier, mut units) = if paragraphs.len() >= target_count {
      (SegmentTier::Paragraphs, paragraphs)
    } else {
      (SegmentTier::Windows, dedup(split_windows(text)))
    };
    units.truncate(cap);
    (tier, units)
  };
  debug!(target: "mcq", ?tier, units = units.len(), target_count, "Segmented source text");
  Segmentation { tier, units }
}

fn split_sentences(text: &str) -> Vec<String> {
  text
    .split(|c: char| matches!(c, '.' | '!' | '?'))
    .map(str::trim)
    .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
    .map(str::to_string)
    .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
  text
    .replace("\r\n", "\n")
    .split("\n\n")
    .map(str::trim)
    .filter(|p| p.chars().count() > MIN_BLOCK_CHARS)
    .map(str::to_string)
    .collect()
}

fn split_windows(text: &str) -> Vec<String> {
  let chars: Vec<char> = text.chars().collect();
  chars
    .chunks(WINDOW_CHARS)
    .filter(|w| w.len() > MIN_BLOCK_CHARS)
    .map(|w| w.iter().collect::<String>())
    .filter(|w| !w.trim().is_empty())
    .collect()
}

// Keeps first occurrences, in order.
fn dedup(units: Vec<String>) -> Vec<String> {
  let mut seen = HashSet::new();
  units.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const PROSE: &str = "Photosynthesis converts light energy into chemical energy. \
    Chlorophyll absorbs mostly blue and red wavelengths! \
    Why do leaves change colour when autumn arrives? \
    Glucose produced by plants feeds most of the food chain. \
    Short one.";

  #[test]
  fn sentences_are_preferred_when_plentiful() {
    let seg = segment_with_tier(PROSE, 3);
    assert_eq!(seg.tier, SegmentTier::Sentences);
    assert_eq!(seg.units.len(), 4);
    assert!(seg.units.iter().all(|u| u.chars().count() > MIN_SENTENCE_CHARS));
    assert!(!seg.units.iter().any(|u| u.contains("Short one")));
  }

  #[test]
  fn sentence_tier_is_not_capped() {
    let seg = segment_with_tier(PROSE, 1);
    assert_eq!(seg.tier, SegmentTier::Sentences);
    assert_eq!(seg.units.len(), 4);
  }

  #[test]
  fn fallback_tiers_are_capped_at_twice_the_target() {
    let para = "a paragraph with no sentence stop that still runs past fifty characters";
    let text = (0..6).map(|i| format!("{para} {i}")).collect::<Vec<_>>().join("\n\n");
    let seg = segment_with_tier(&text, 2);
    assert_eq!(seg.tier, SegmentTier::Paragraphs);
    assert_eq!(seg.units.len(), 4);
  }

  #[test]
  fn window_length_counts_surrounding_whitespace() {
    // Second window is 10 spaces + 45 letters: 55 chars raw, 45 trimmed.
    let text = format!("{}{}{}", "x".repeat(200), " ".repeat(10), "y".repeat(45));
    let seg = segment_with_tier(&text, 5);
    assert_eq!(seg.tier, SegmentTier::Windows);
    assert_eq!(seg.units.len(), 2);
    assert_eq!(seg.units[1].chars().count(), 55);
  }

  #[test]
  fn falls_back_to_paragraphs() {
    let text = "First paragraph without terminal punctuation but plenty of words in it\n\n\
      Second paragraph also lacking any sentence stop yet long enough to count\n\n\
      tiny";
    let seg = segment_with_tier(text, 2);
    assert_eq!(seg.tier, SegmentTier::Paragraphs);
    assert_eq!(seg.units.len(), 2);
  }

  #[test]
  fn falls_back_to_windows() {
    let text = "word ".repeat(100); // 500 chars, no punctuation, no blank lines
    let seg = segment_with_tier(&text, 5);
    assert_eq!(seg.tier, SegmentTier::Windows);
    // 200 + 200 + 100 chars; the two full windows are identical and collapse.
    assert_eq!(seg.units.len(), 2);
    assert!(seg.units.iter().all(|u| u.chars().count() > MIN_BLOCK_CHARS));
  }

  #[test]
  fn duplicates_are_dropped() {
    let text = "The mitochondria is the powerhouse of the cell. The mitochondria is the powerhouse of the cell. \
      Ribosomes assemble proteins from amino acids.";
    let units = segment(text, 2);
    assert_eq!(units.len(), 2);
    assert_ne!(units[0], units[1]);
  }

  #[test]
  fn blank_text_yields_nothing() {
    assert!(segment("   \n\n  ", 5).is_empty());
  }
}
