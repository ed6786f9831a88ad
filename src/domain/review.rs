use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::word::{NewWord, Word};

/// One multiple-choice prompt: a translation and four candidate words,
/// exactly one of which is the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
  #[serde(rename = "translated")]
  pub target_translation: String,
  pub options: [Word; 4],
  #[serde(rename = "word")]
  pub answer: Word,
}

/// What a caller receives when starting a review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSession {
  #[serde(rename = "firstStage")]
  pub stage: Vec<ReviewItem>,
  #[serde(rename = "words")]
  pub due_words: Vec<Word>,
}

/// How an update entry names the word it applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordRef {
  Id(i64),
  Text(String),
}

impl WordRef {
  /// Numeric keys address ids, anything else addresses text
  pub fn from_key(key: &str) -> Self {
    match key.trim().parse::<i64>() {
      Ok(id) => Self::Id(id),
      Err(_) => Self::Text(key.to_string()),
    }
  }

  pub fn matches(&self, word: &Word) -> bool {
    match self {
      Self::Id(id) => word.id == *id,
      Self::Text(text) => word.text == *text,
    }
  }
}

impl fmt::Display for WordRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Id(id) => write!(f, "#{}", id),
      Self::Text(text) => write!(f, "\"{}\"", text),
    }
  }
}

/// A single requested change to the word collection
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
  /// Result of reviewing an existing word
  Outcome { passed: bool },
  /// Insert a brand-new word
  NewWord(NewWord),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEntry {
  pub target: WordRef,
  pub op: UpdateOp,
}

/// A batch of review results plus the flags that alter how they apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewResults {
  pub entries: Vec<UpdateEntry>,
  /// Keep `next_repeat_time` as-is
  pub suppress_date_change: bool,
  /// Do not advance `repeat_index` on success
  pub suppress_index_increment: bool,
}

/// Payload values on the wire are either a bare boolean or a word object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUpdate {
  Outcome(bool),
  NewWord(NewWord),
}

#[derive(Deserialize)]
struct RawResults {
  #[serde(rename = "resultState", default)]
  result_state: IndexMap<String, RawUpdate>,
  #[serde(rename = "decreaseRepeatIndexOnly", default)]
  decrease_repeat_index_only: bool,
}

impl ReviewResults {
  pub fn outcome(mut self, target: WordRef, passed: bool) -> Self {
    self.entries.push(UpdateEntry {
      target,
      op: UpdateOp::Outcome { passed },
    });
    self
  }

  pub fn new_word(mut self, word: NewWord) -> Self {
    self.entries.push(UpdateEntry {
      target: WordRef::Text(word.text.clone()),
      op: UpdateOp::NewWord(word),
    });
    self
  }

  /// Decode the `{"resultState": {...}, "decreaseRepeatIndexOnly": ..}`
  /// payload posted by the review client.
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    let raw: RawResults = serde_json::from_str(json)?;
    let entries = raw
      .result_state
      .into_iter()
      .map(|(key, value)| UpdateEntry {
        target: WordRef::from_key(&key),
        op: match value {
          RawUpdate::Outcome(passed) => UpdateOp::Outcome { passed },
          RawUpdate::NewWord(word) => UpdateOp::NewWord(word),
        },
      })
      .collect();

    Ok(Self {
      entries,
      suppress_date_change: raw.decrease_repeat_index_only,
      suppress_index_increment: raw.decrease_repeat_index_only,
    })
  }
}

/// Appended to the history log after every applied outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub word_id: i64,
  pub repeat_index: u32,
  pub repeated_at: DateTime<Utc>,
}
