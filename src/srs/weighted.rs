//! Weight-biased sampling for practice material.

use rand::Rng;

use crate::domain::Word;
use crate::error::SrsError;

/// Pick one index from `candidates` with probability proportional to weight.
/// Higher weight = more likely to be selected.
///
/// Weights are scaled by the largest one so the running total stays finite
/// however large the stored weights are.
fn weighted_pick<R: Rng + ?Sized>(candidates: &[&Word], rng: &mut R) -> usize {
  let max_weight = candidates.iter().map(|w| w.weight).fold(0.0, f64::max);
  let total_weight: f64 = candidates.iter().map(|w| w.weight / max_weight).sum();
  let mut target = rng.random_range(0.0..total_weight);

  for (index, word) in candidates.iter().enumerate() {
    target -= word.weight / max_weight;
    if target < 0.0 {
      return index;
    }
  }

  // Rounding can leave a sliver past the last word
  candidates.len() - 1
}

/// Draw `k` distinct words, each draw biased by the remaining words' weights.
///
/// Words without a positive, finite weight are never drawn, so asking for
/// more words than carry such a weight fails.
pub fn sample_by_weight<R: Rng + ?Sized>(
  words: &[Word],
  k: usize,
  rng: &mut R,
) -> Result<Vec<Word>, SrsError> {
  let mut candidates: Vec<&Word> = words
    .iter()
    .filter(|w| w.weight.is_finite() && w.weight > 0.0)
    .collect();
  if k > candidates.len() {
    return Err(SrsError::InsufficientSample {
      requested: k,
      available: candidates.len(),
    });
  }

  let mut sample = Vec::with_capacity(k);
  for _ in 0..k {
    let index = weighted_pick(&candidates, rng);
    sample.push(candidates.swap_remove(index).clone());
  }
  Ok(sample)
}
