//! Review session flow: load a snapshot, run the scheduling core, persist.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::Path;

use crate::config::AppConfig;
use crate::db::WordStore;
use crate::domain::{ReviewResults, ReviewSession, Word};
use crate::error::Result;
use crate::ingest;
use crate::srs::{self, UpdateReport};

/// Apply a batch of results to the store and persist everything it touched.
pub fn submit_results<S: WordStore + ?Sized>(
  store: &S,
  config: &AppConfig,
  results: &ReviewResults,
  now: DateTime<Utc>,
) -> Result<UpdateReport> {
  let words = store.load_words()?;
  let report = srs::apply_updates(words, results, &config.weights, now);

  if !report.updated.is_empty() || !report.created.is_empty() {
    store.save_words(&report.words)?;
  }
  if !report.history.is_empty() {
    store.append_history(&report.history)?;
  }
  Ok(report)
}

/// Import pending words from the drop file.
///
/// The file is emptied only after the new words are stored, so a failed
/// save leaves them in place for the next run.
pub fn ingest_input<S: WordStore + ?Sized>(
  store: &S,
  config: &AppConfig,
  input_path: &Path,
  now: DateTime<Utc>,
) -> Result<UpdateReport> {
  let pending = ingest::read_input(input_path)?;
  let report = if pending.entries.is_empty() {
    UpdateReport::default()
  } else {
    submit_results(store, config, &pending, now)?
  };
  ingest::clear_input(input_path)?;
  Ok(report)
}

/// Start a review: import pending input, pick the due batch and build its
/// multiple-choice stage.
pub fn start_review<S: WordStore + ?Sized, R: Rng + ?Sized>(
  store: &S,
  config: &AppConfig,
  input_path: &Path,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Result<ReviewSession> {
  ingest_input(store, config, input_path, now)?;

  let words = store.load_words()?;
  let due_words = srs::select_due(&words, config.review.words_per_try, now, rng);
  let stage = srs::build_stage(&words, &due_words, rng)?;

  tracing::info!(
    "Review started: {} due words, {} items from {} tracked",
    due_words.len(),
    stage.len(),
    words.len()
  );
  Ok(ReviewSession { stage, due_words })
}

/// Words to weave into generated practice text, biased toward weak words.
pub fn practice_words<S: WordStore + ?Sized, R: Rng + ?Sized>(
  store: &S,
  count: usize,
  rng: &mut R,
) -> Result<Vec<Word>> {
  let words = store.load_words()?;
  Ok(srs::sample_by_weight(&words, count, rng)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{MemoryWordStore, SqliteWordStore};
  use crate::domain::{HistoryEntry, PartOfSpeech, WordRef};
  use crate::error::{Error, SrsError, StoreError};
  use chrono::Duration;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn word(id: i64, text: &str, pos: Option<&str>, due_in_days: i64, now: DateTime<Utc>) -> Word {
    let mut w = Word::new(id, text.to_string(), format!("t-{}", text), 1.0);
    w.part_of_speech = pos.and_then(PartOfSpeech::from_tag);
    w.next_repeat_time = now + Duration::days(due_in_days);
    w
  }

  fn vocabulary(now: DateTime<Utc>) -> Vec<Word> {
    let mut run = word(1, "run", Some("v"), -1, now);
    run.repeat_index = 2;
    vec![
      run,
      word(2, "eat", Some("v"), 3, now),
      word(3, "sleep", Some("v"), 3, now),
      word(4, "write", Some("v"), 3, now),
      word(5, "apple", Some("n"), 3, now),
      word(6, "house", Some("n"), 3, now),
      word(7, "green", Some("adj"), 3, now),
      word(8, "slowly", Some("adv"), 3, now),
      word(9, "hello", None, 3, now),
      word(10, "because", None, 3, now),
    ]
  }

  #[test]
  fn test_review_then_fail_scenario() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vocabulary(now));
    let config = AppConfig::default();
    let mut rng = StdRng::seed_from_u64(17);
    let dir = tempfile::tempdir().unwrap();

    let session = start_review(&store, &config, &dir.path().join("input.txt"), now, &mut rng).unwrap();
    assert_eq!(session.due_words.len(), 1);
    assert_eq!(session.due_words[0].text, "run");
    assert_eq!(session.stage.len(), 1);
    let item = &session.stage[0];
    assert!(item.options.iter().any(|w| w.text == "run"));
    for option in item.options.iter().filter(|w| w.id != 1) {
      assert_eq!(option.part_of_speech, Some(PartOfSpeech::Verb));
    }

    let results = ReviewResults::default().outcome(WordRef::Id(1), false);
    let report = submit_results(&store, &config, &results, now).unwrap();
    assert!(report.dropped.is_empty());

    let words = store.load_words().unwrap();
    let run = words.iter().find(|w| w.id == 1).unwrap();
    assert_eq!(run.repeat_index, 1);
    assert_eq!(run.next_repeat_time, now + Duration::days(1));
    assert!((run.weight - 2.5).abs() < 1e-9);

    let history = store.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].word_id, 1);
    assert_eq!(history[0].repeat_index, 1);
  }

  #[test]
  fn test_unknown_reference_dropped_rest_applied() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vocabulary(now));
    let config = AppConfig::default();

    let results = ReviewResults::from_json(r#"{"resultState": {"1": true, "404": false}}"#).unwrap();
    let report = submit_results(&store, &config, &results, now).unwrap();
    assert_eq!(report.dropped, vec![WordRef::Id(404)]);

    let run = store.load_words().unwrap().into_iter().find(|w| w.id == 1).unwrap();
    assert_eq!(run.repeat_index, 3);
  }

  #[test]
  fn test_review_with_tiny_pool_fails() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vec![
      word(1, "run", None, -1, now),
      word(2, "eat", None, 2, now),
    ]);
    let mut rng = StdRng::seed_from_u64(1);
    let dir = tempfile::tempdir().unwrap();
    let err = start_review(&store, &AppConfig::default(), &dir.path().join("input.txt"), now, &mut rng)
      .unwrap_err();
    assert!(matches!(err, Error::Srs(SrsError::InsufficientPool { .. })));
  }

  #[test]
  fn test_review_empty_store() {
    let store = MemoryWordStore::default();
    let mut rng = StdRng::seed_from_u64(1);
    let dir = tempfile::tempdir().unwrap();
    let session =
      start_review(&store, &AppConfig::default(), &dir.path().join("input.txt"), Utc::now(), &mut rng).unwrap();
    assert!(session.stage.is_empty());
    assert!(session.due_words.is_empty());
  }

  #[test]
  fn test_review_ingests_pending_input_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    std::fs::write(
      &input,
      "run (v) = бежать\neat (v) = есть\nsleep (v) = спать\nwrite (v) = писать\napple (n) = яблоко\n",
    )
    .unwrap();

    let config = AppConfig::default();
    let store = SqliteWordStore::in_memory(config.weights.default_weight).unwrap();
    let now = Utc::now();

    let mut rng = StdRng::seed_from_u64(3);
    let session = start_review(&store, &config, &input, now, &mut rng).unwrap();
    // Every word is due, so nothing is left over for distractors
    assert_eq!(session.due_words.len(), 5);
    assert!(session.stage.is_empty());

    let words = store.load_words().unwrap();
    let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(words.iter().all(|w| w.repeat_index == 0 && w.is_due(now)));
    assert_eq!(std::fs::read_to_string(&input).unwrap(), "");
  }

  /// Store whose writes always fail
  struct ReadOnlyStore;

  impl WordStore for ReadOnlyStore {
    fn load_words(&self) -> std::result::Result<Vec<Word>, StoreError> {
      Ok(Vec::new())
    }

    fn save_words(&self, _words: &[Word]) -> std::result::Result<(), StoreError> {
      Err(StoreError::Lock)
    }

    fn append_history(&self, _entries: &[HistoryEntry]) -> std::result::Result<(), StoreError> {
      Ok(())
    }
  }

  #[test]
  fn test_failed_save_keeps_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let contents = "run (v) = бежать\ntree (n) = дерево\n";
    std::fs::write(&input, contents).unwrap();

    let result = ingest_input(&ReadOnlyStore, &AppConfig::default(), &input, Utc::now());
    assert!(matches!(result, Err(Error::Store(StoreError::Lock))));
    assert_eq!(std::fs::read_to_string(&input).unwrap(), contents);
  }

  #[test]
  fn test_ingest_clears_unparseable_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    std::fs::write(&input, "just a note\n").unwrap();

    let store = MemoryWordStore::default();
    let report = ingest_input(&store, &AppConfig::default(), &input, Utc::now()).unwrap();
    assert!(report.created.is_empty());
    assert!(store.load_words().unwrap().is_empty());
    assert_eq!(std::fs::read_to_string(&input).unwrap(), "");
  }

  #[test]
  fn test_new_word_ids_follow_payload_order() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vocabulary(now));
    let json = r#"{
      "resultState": {
        "zebra": {"word": "zebra", "translation": "зебра"},
        "apple pie": {"word": "apple pie", "translation": "яблочный пирог"}
      }
    }"#;
    let results = ReviewResults::from_json(json).unwrap();
    let report = submit_results(&store, &AppConfig::default(), &results, now).unwrap();
    assert_eq!(report.created, vec![11, 12]);

    let words = store.load_words().unwrap();
    let zebra = words.iter().find(|w| w.text == "zebra").unwrap();
    assert_eq!(zebra.id, 11);
  }

  #[test]
  fn test_suppressed_flags_through_json() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vocabulary(now));
    let before = store.load_words().unwrap()[0].clone();

    let results =
      ReviewResults::from_json(r#"{"resultState": {"1": true}, "decreaseRepeatIndexOnly": true}"#).unwrap();
    submit_results(&store, &AppConfig::default(), &results, now).unwrap();

    let after = store.load_words().unwrap()[0].clone();
    assert_eq!(after.repeat_index, before.repeat_index);
    assert_eq!(after.next_repeat_time, before.next_repeat_time);
    assert!(after.weight < before.weight);
  }

  #[test]
  fn test_practice_words() {
    let now = Utc::now();
    let store = MemoryWordStore::new(vocabulary(now));
    let mut rng = StdRng::seed_from_u64(8);
    assert_eq!(practice_words(&store, 5, &mut rng).unwrap().len(), 5);
    assert!(matches!(
      practice_words(&store, 11, &mut rng),
      Err(Error::Srs(SrsError::InsufficientSample { .. }))
    ));
  }
}
