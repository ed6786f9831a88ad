//! Word CRUD operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, Transaction};

use crate::domain::{PartOfSpeech, Word};
use crate::error::StoreError;

const WORD_COLUMNS: &str =
  "id, word, translation, part_of_speech, example, repeat_index, next_repeat_time, weight";

/// Load every word. Rows without a stored weight get `default_weight`.
pub fn get_all_words(conn: &Connection, default_weight: f64) -> Result<Vec<Word>, StoreError> {
  let mut stmt = conn.prepare(&format!("SELECT {} FROM words ORDER BY id ASC", WORD_COLUMNS))?;

  let rows = stmt
    .query_map([], |row| row_to_word(row, default_weight))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows.into_iter().map(|(word, example)| finish_word(word, example)).collect()
}

/// Insert or overwrite a word, keeping its id
pub fn upsert_word(tx: &Transaction<'_>, word: &Word) -> Result<(), StoreError> {
  let example = if word.example.is_empty() {
    None
  } else {
    Some(serde_json::to_string(&word.example)?)
  };

  tx.execute(
    r#"
    INSERT INTO words (id, word, translation, part_of_speech, example, repeat_index, next_repeat_time, weight)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(id) DO UPDATE SET
      word = excluded.word,
      translation = excluded.translation,
      part_of_speech = excluded.part_of_speech,
      example = excluded.example,
      repeat_index = excluded.repeat_index,
      next_repeat_time = excluded.next_repeat_time,
      weight = excluded.weight
    "#,
    params![
      word.id,
      word.text,
      word.translation,
      word.part_of_speech.as_ref().map(|p| p.as_str()),
      example,
      word.repeat_index,
      word.next_repeat_time.to_rfc3339(),
      word.weight,
    ],
  )?;
  Ok(())
}

/// Map a row to a word plus its raw example JSON, decoded afterwards so
/// JSON errors surface as `StoreError::Json`.
fn row_to_word(row: &Row<'_>, default_weight: f64) -> rusqlite::Result<(Word, Option<String>)> {
  let next_repeat_time: String = row.get(6)?;
  let part_of_speech: Option<String> = row.get(3)?;
  let weight: Option<f64> = row.get(7)?;

  let word = Word {
    id: row.get(0)?,
    text: row.get(1)?,
    translation: row.get(2)?,
    part_of_speech: part_of_speech.as_deref().and_then(PartOfSpeech::from_tag),
    example: Vec::new(),
    repeat_index: row.get(5)?,
    next_repeat_time: parse_timestamp(&next_repeat_time),
    weight: weight.unwrap_or(default_weight),
  };
  Ok((word, row.get(4)?))
}

fn finish_word(mut word: Word, example: Option<String>) -> Result<Word, StoreError> {
  if let Some(json) = example.filter(|s| !s.is_empty()) {
    word.example = serde_json::from_str(&json)?;
  }
  Ok(word)
}

/// Unparseable timestamps are treated as "due now"
fn parse_timestamp(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
