mod review;
mod word;

pub use review::{HistoryEntry, ReviewItem, ReviewResults, ReviewSession, UpdateEntry, UpdateOp, WordRef};
pub use word::{NewWord, PartOfSpeech, Word};
