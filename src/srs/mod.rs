//! Spaced-repetition scheduling core.
//!
//! Pure functions over word snapshots. Randomized operations take the random
//! source as an argument so callers decide between `rand::rng()` and a seeded
//! generator.

pub mod distractors;
pub mod due_selector;
pub mod outcome;
pub mod repeat_date;
pub mod weighted;

pub use distractors::build_stage;
pub use due_selector::select_due;
pub use outcome::{apply_outcome, apply_updates, create_word, OutcomeFlags, UpdateReport};
pub use repeat_date::next_due_timestamp;
pub use weighted::sample_by_weight;
