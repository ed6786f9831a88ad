//! Multiple-choice item construction.
//!
//! Each due word is shown next to three distractors drawn from the rest of
//! the collection. When the word carries a verb/noun/adjective/adverb tag
//! and enough words share that tag, distractors come from the same tag so
//! the options are harder to tell apart.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

use crate::config::{DISTRACTOR_COUNT, OPTION_COUNT};
use crate::domain::{ReviewItem, Word};
use crate::error::SrsError;

/// Words eligible as distractors: everything whose text is not under test,
/// one entry per distinct text.
fn distractor_pool<'a>(all_words: &'a [Word], due_words: &[Word]) -> Vec<&'a Word> {
  let tested: HashSet<&str> = due_words.iter().map(|w| w.text.as_str()).collect();
  let mut seen: HashSet<&str> = HashSet::new();

  all_words
    .iter()
    .filter(|w| !tested.contains(w.text.as_str()))
    .filter(|w| seen.insert(w.text.as_str()))
    .collect()
}

/// Pick the distractors for one word from the prepared pool
fn pick_distractors<'a, R: Rng + ?Sized>(
  word: &Word,
  pool: &[&'a Word],
  rng: &mut R,
) -> Result<Vec<&'a Word>, SrsError> {
  if let Some(pos) = word.part_of_speech.as_ref().filter(|p| p.has_confusable_pool()) {
    let same_pos: Vec<&Word> = pool
      .iter()
      .copied()
      .filter(|w| w.part_of_speech.as_ref() == Some(pos))
      .collect();
    if same_pos.len() >= DISTRACTOR_COUNT {
      return Ok(same_pos.choose_multiple(rng, DISTRACTOR_COUNT).copied().collect());
    }
  }

  if pool.len() < DISTRACTOR_COUNT {
    return Err(SrsError::InsufficientPool {
      needed: DISTRACTOR_COUNT,
      available: pool.len(),
    });
  }
  Ok(pool.choose_multiple(rng, DISTRACTOR_COUNT).copied().collect())
}

/// Build one review item with the answer at a random slot
pub fn compose_item<R: Rng + ?Sized>(
  word: &Word,
  pool: &[&Word],
  rng: &mut R,
) -> Result<ReviewItem, SrsError> {
  let mut options: Vec<Word> = pick_distractors(word, pool, rng)?
    .into_iter()
    .cloned()
    .collect();

  let slot = rng.random_range(0..OPTION_COUNT);
  options.insert(slot, word.clone());

  let options: [Word; OPTION_COUNT] = options.try_into().map_err(|v: Vec<Word>| {
    SrsError::InsufficientPool {
      needed: DISTRACTOR_COUNT,
      available: v.len().saturating_sub(1),
    }
  })?;

  Ok(ReviewItem {
    target_translation: word.translation.clone(),
    options,
    answer: word.clone(),
  })
}

/// Build the multiple-choice stage for a review batch.
///
/// Returns an empty stage when either the distractor pool or the batch is
/// empty. A non-empty pool with fewer than three words is an error rather
/// than a shorter option list, since a short list would give the answer
/// away by elimination.
pub fn build_stage<R: Rng + ?Sized>(
  all_words: &[Word],
  due_words: &[Word],
  rng: &mut R,
) -> Result<Vec<ReviewItem>, SrsError> {
  let pool = distractor_pool(all_words, due_words);
  if pool.is_empty() || due_words.is_empty() {
    tracing::debug!(
      "Empty stage: {} pool words, {} due words",
      pool.len(),
      due_words.len()
    );
    return Ok(Vec::new());
  }

  due_words
    .iter()
    .map(|word| compose_item(word, &pool, &mut *rng))
    .collect()
}
