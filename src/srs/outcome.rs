//! Applies review results to words.
//!
//! This is the only place scheduling state changes: `repeat_index`,
//! `weight` and `next_repeat_time` are written here and nowhere else.

use chrono::{DateTime, Utc};

use super::repeat_date::next_due_timestamp;
use crate::config::WeightConfig;
use crate::domain::{HistoryEntry, NewWord, PartOfSpeech, ReviewResults, UpdateOp, Word, WordRef};
use crate::error::SrsError;

/// Flags that soften how an outcome is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeFlags {
  pub suppress_date_change: bool,
  pub suppress_index_increment: bool,
}

impl From<&ReviewResults> for OutcomeFlags {
  fn from(results: &ReviewResults) -> Self {
    Self {
      suppress_date_change: results.suppress_date_change,
      suppress_index_increment: results.suppress_index_increment,
    }
  }
}

/// Weight after a failed review.
///
/// The +1 offset makes even a low-weight word climb quickly; success decay
/// below is purely multiplicative.
pub fn failed_weight(weight: f64, config: &WeightConfig) -> f64 {
  config.clamp(1.0 + weight * config.weight_increase_fail)
}

/// Weight after a successful review
pub fn passed_weight(weight: f64, config: &WeightConfig) -> f64 {
  config.clamp(weight * config.weight_decrease_success)
}

/// Apply a single pass/fail outcome and return the updated word.
///
/// A failure always resets the repeat index to 1, whatever the flags say.
pub fn apply_outcome(
  mut word: Word,
  passed: bool,
  flags: OutcomeFlags,
  config: &WeightConfig,
  now: DateTime<Utc>,
) -> Word {
  if passed {
    if !flags.suppress_index_increment {
      word.repeat_index = word.repeat_index.saturating_add(1);
    }
    word.weight = passed_weight(word.weight, config);
  } else {
    word.repeat_index = 1;
    word.weight = failed_weight(word.weight, config);
  }

  if !flags.suppress_date_change {
    word.next_repeat_time = next_due_timestamp(word.repeat_index, now);
  }

  word
}

/// Create a word from its definition: never repeated, due immediately,
/// default weight.
pub fn create_word(id: i64, definition: &NewWord, config: &WeightConfig) -> Word {
  let mut word = Word::new(
    id,
    definition.text.clone(),
    definition.translation.clone(),
    config.default_weight,
  );
  word.part_of_speech = definition
    .part_of_speech
    .as_deref()
    .and_then(PartOfSpeech::from_tag);
  word.example = definition.example.clone();
  word
}

/// Result of applying a batch of updates
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
  /// The full collection after the batch, new words appended
  pub words: Vec<Word>,
  /// One entry per applied outcome
  pub history: Vec<HistoryEntry>,
  /// Ids of words inserted by this batch
  pub created: Vec<i64>,
  /// Ids of existing words whose state changed
  pub updated: Vec<i64>,
  /// Entries that named a word not in the collection
  pub dropped: Vec<WordRef>,
}

/// Apply a whole batch to the collection.
///
/// Entries naming unknown words are skipped and reported in `dropped`; the
/// rest of the batch still applies.
pub fn apply_updates(
  words: Vec<Word>,
  results: &ReviewResults,
  config: &WeightConfig,
  now: DateTime<Utc>,
) -> UpdateReport {
  let flags = OutcomeFlags::from(results);
  let mut next_id = words.iter().map(|w| w.id).max().unwrap_or(0) + 1;
  let mut report = UpdateReport {
    words,
    ..UpdateReport::default()
  };

  for entry in &results.entries {
    match &entry.op {
      UpdateOp::Outcome { passed } => {
        let Some(index) = report.words.iter().position(|w| entry.target.matches(w)) else {
          let err = SrsError::UnknownWordReference(entry.target.clone());
          tracing::warn!("Dropping review result: {}", err);
          report.dropped.push(entry.target.clone());
          continue;
        };

        let word = report.words[index].clone();
        let updated = apply_outcome(word, *passed, flags, config, now);
        report.history.push(HistoryEntry {
          word_id: updated.id,
          repeat_index: updated.repeat_index,
          repeated_at: now,
        });
        report.updated.push(updated.id);
        report.words[index] = updated;
      }
      UpdateOp::NewWord(definition) => {
        let word = create_word(next_id, definition, config);
        tracing::debug!("Adding word {} \"{}\"", word.id, word.text);
        report.created.push(word.id);
        report.words.push(word);
        next_id += 1;
      }
    }
  }

  tracing::info!(
    "Applied review batch: {} updated, {} created, {} dropped",
    report.updated.len(),
    report.created.len(),
    report.dropped.len()
  );
  report
}
