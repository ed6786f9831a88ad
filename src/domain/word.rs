use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Part-of-speech tag attached to a word.
///
/// Verbs, nouns, adjectives and adverbs get same-tag distractors; any other
/// tag is kept verbatim but treated like an untagged word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartOfSpeech {
  Verb,
  Noun,
  Adjective,
  Adverb,
  Other(String),
}

impl PartOfSpeech {
  /// Parse a raw tag. Trailing dots are dropped ("adj." -> "adj").
  /// Returns None for an empty tag.
  pub fn from_tag(tag: &str) -> Option<Self> {
    let tag = tag.trim().replace('.', "");
    match tag.as_str() {
      "" => None,
      "v" => Some(Self::Verb),
      "n" => Some(Self::Noun),
      "adj" => Some(Self::Adjective),
      "adv" => Some(Self::Adverb),
      _ => Some(Self::Other(tag.clone())),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Verb => "v",
      Self::Noun => "n",
      Self::Adjective => "adj",
      Self::Adverb => "adv",
      Self::Other(tag) => tag.as_str(),
    }
  }

  /// Whether distractors for this tag should come from the same tag
  pub fn has_confusable_pool(&self) -> bool {
    !matches!(self, Self::Other(_))
  }
}

impl From<String> for PartOfSpeech {
  fn from(tag: String) -> Self {
    Self::from_tag(&tag).unwrap_or(Self::Other(tag))
  }
}

impl From<PartOfSpeech> for String {
  fn from(pos: PartOfSpeech) -> Self {
    pos.as_str().to_string()
  }
}

/// A tracked vocabulary item together with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
  #[serde(rename = "wordId")]
  pub id: i64,
  #[serde(rename = "word")]
  pub text: String,
  pub translation: String,
  pub part_of_speech: Option<PartOfSpeech>,
  #[serde(default)]
  pub example: Vec<String>,

  // Scheduling state, written only by the outcome updater
  pub repeat_index: u32,
  pub next_repeat_time: DateTime<Utc>,
  pub weight: f64,
}

impl Word {
  /// A fresh word: never repeated and due immediately.
  pub fn new(id: i64, text: String, translation: String, default_weight: f64) -> Self {
    Self {
      id,
      text,
      translation,
      part_of_speech: None,
      example: Vec::new(),
      repeat_index: 0,
      next_repeat_time: DateTime::<Utc>::UNIX_EPOCH,
      weight: default_weight,
    }
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_repeat_time < now
  }
}

/// Definition of a word to be inserted, as supplied by ingestion or a
/// review-result payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
  #[serde(rename = "word")]
  pub text: String,
  pub translation: String,
  #[serde(default)]
  pub part_of_speech: Option<String>,
  #[serde(default)]
  pub example: Vec<String>,
}
