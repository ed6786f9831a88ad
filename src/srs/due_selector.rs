//! Picks the batch of words due for review.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::domain::Word;

/// Select up to `limit` distinct due words.
///
/// The collection is shuffled first so equally-due words are served in
/// random order; among words sharing the same text the first one after the
/// shuffle wins.
pub fn select_due<R: Rng + ?Sized>(
  words: &[Word],
  limit: usize,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Vec<Word> {
  let mut shuffled: Vec<&Word> = words.iter().collect();
  shuffled.shuffle(rng);

  let mut seen: HashSet<&str> = HashSet::new();
  let mut selected = Vec::with_capacity(limit.min(words.len()));

  for word in shuffled {
    if selected.len() >= limit {
      break;
    }
    if !word.is_due(now) {
      continue;
    }
    if seen.insert(word.text.as_str()) {
      selected.push(word.clone());
    }
  }

  tracing::debug!("Selected {} of {} words for review", selected.len(), words.len());
  selected
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use proptest::prelude::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn word(id: i64, text: &str, due_in_hours: i64, now: DateTime<Utc>) -> Word {
    let mut w = Word::new(id, text.to_string(), format!("t-{}", text), 1.0);
    w.next_repeat_time = now + Duration::hours(due_in_hours);
    w
  }

  #[test]
  fn test_empty_input() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(select_due(&[], 10, Utc::now(), &mut rng).is_empty());
  }

  #[test]
  fn test_nothing_due() {
    let now = Utc::now();
    let words = vec![word(1, "a", 1, now), word(2, "b", 48, now)];
    let mut rng = StdRng::seed_from_u64(1);
    assert!(select_due(&words, 10, now, &mut rng).is_empty());
  }

  #[test]
  fn test_only_due_returned() {
    let now = Utc::now();
    let words = vec![
      word(1, "a", -1, now),
      word(2, "b", 5, now),
      word(3, "c", -30, now),
      word(4, "d", 0, now),
    ];
    let mut rng = StdRng::seed_from_u64(7);
    let mut ids: Vec<i64> = select_due(&words, 10, now, &mut rng).iter().map(|w| w.id).collect();
    ids.sort();
    // "d" is due exactly now, which is not strictly before now
    assert_eq!(ids, vec![1, 3]);
  }

  #[test]
  fn test_limit_respected() {
    let now = Utc::now();
    let words: Vec<Word> = (0..30).map(|i| word(i, &format!("w{}", i), -1, now)).collect();
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(select_due(&words, 10, now, &mut rng).len(), 10);
    assert!(select_due(&words, 0, now, &mut rng).is_empty());
  }

  #[test]
  fn test_duplicates_collapsed() {
    let now = Utc::now();
    let words = vec![
      word(1, "run", -1, now),
      word(2, "run", -2, now),
      word(3, "run", -3, now),
      word(4, "walk", -1, now),
    ];
    let mut rng = StdRng::seed_from_u64(11);
    let selected = select_due(&words, 10, now, &mut rng);
    assert_eq!(selected.len(), 2);
    let texts: HashSet<&str> = selected.iter().map(|w| w.text.as_str()).collect();
    assert!(texts.contains("run") && texts.contains("walk"));
  }

  #[test]
  fn test_duplicate_of_not_due_word_still_selected() {
    let now = Utc::now();
    let words = vec![word(1, "run", 24, now), word(2, "run", -1, now)];
    let mut rng = StdRng::seed_from_u64(5);
    let selected = select_due(&words, 10, now, &mut rng);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, 2);
  }

  #[test]
  fn test_order_varies_with_seed() {
    let now = Utc::now();
    let words: Vec<Word> = (0..20).map(|i| word(i, &format!("w{}", i), -1, now)).collect();
    let orders: HashSet<Vec<i64>> = (0..5)
      .map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        select_due(&words, 20, now, &mut rng).iter().map(|w| w.id).collect()
      })
      .collect();
    assert!(orders.len() > 1);
  }

  proptest! {
    #[test]
    fn prop_selection_invariants(
      specs in prop::collection::vec((0u8..8, -72i64..72), 0..40),
      limit in 0usize..15,
      seed in any::<u64>(),
    ) {
      let now = Utc::now();
      let words: Vec<Word> = specs
        .iter()
        .enumerate()
        .map(|(i, (text, hours))| word(i as i64, &format!("w{}", text), *hours, now))
        .collect();
      let mut rng = StdRng::seed_from_u64(seed);
      let selected = select_due(&words, limit, now, &mut rng);

      prop_assert!(selected.len() <= limit);
      let texts: HashSet<&str> = selected.iter().map(|w| w.text.as_str()).collect();
      prop_assert_eq!(texts.len(), selected.len());
      prop_assert!(selected.iter().all(|w| w.next_repeat_time < now));

      // Nothing due was left out unless the batch is full
      let due_texts: HashSet<&str> = words
        .iter()
        .filter(|w| w.is_due(now))
        .map(|w| w.text.as_str())
        .collect();
      prop_assert_eq!(selected.len(), due_texts.len().min(limit));
    }
  }
}
