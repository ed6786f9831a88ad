//! Append-only review history

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};

use crate::domain::HistoryEntry;
use crate::error::StoreError;

pub fn insert_history(tx: &Transaction<'_>, entry: &HistoryEntry) -> Result<i64, StoreError> {
  tx.execute(
    "INSERT INTO words_history (word_id, repeat_index, repeat_date) VALUES (?1, ?2, ?3)",
    params![entry.word_id, entry.repeat_index, entry.repeated_at.to_rfc3339()],
  )?;
  Ok(tx.last_insert_rowid())
}

/// History of one word, oldest first
pub fn get_word_history(conn: &Connection, word_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
  let mut stmt = conn.prepare(
    r#"
    SELECT word_id, repeat_index, repeat_date
    FROM words_history
    WHERE word_id = ?1
    ORDER BY id ASC
    "#,
  )?;

  let entries = stmt
    .query_map(params![word_id], |row| {
      let repeated_at: String = row.get(2)?;
      Ok(HistoryEntry {
        word_id: row.get(0)?,
        repeat_index: row.get(1)?,
        repeated_at: DateTime::parse_from_rfc3339(&repeated_at)
          .map(|dt| dt.with_timezone(&Utc))
          .unwrap_or_else(|_| Utc::now()),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(entries)
}
