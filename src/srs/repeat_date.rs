use chrono::{DateTime, Duration, Utc};

/// Days until the next review, indexed by repeat index. Indices past the
/// end stay at the last interval.
const REPEAT_INTERVAL_DAYS: [i64; 6] = [0, 1, 2, 3, 7, 14];

/// Interval in days for a given repeat index
pub fn interval_days(repeat_index: u32) -> i64 {
  let last = REPEAT_INTERVAL_DAYS.len() - 1;
  REPEAT_INTERVAL_DAYS[(repeat_index as usize).min(last)]
}

/// Timestamp at which a word with `repeat_index` becomes due again
pub fn next_due_timestamp(repeat_index: u32, now: DateTime<Utc>) -> DateTime<Utc> {
  now + Duration::days(interval_days(repeat_index))
}
