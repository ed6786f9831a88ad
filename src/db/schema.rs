use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS words (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      word TEXT NOT NULL,
      translation TEXT NOT NULL,
      part_of_speech TEXT,
      example TEXT,
      repeat_index INTEGER NOT NULL DEFAULT 0,
      next_repeat_time TEXT NOT NULL,
      weight REAL
    );

    CREATE TABLE IF NOT EXISTS words_history (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      word_id INTEGER NOT NULL,
      repeat_index INTEGER NOT NULL,
      repeat_date TEXT NOT NULL,
      FOREIGN KEY (word_id) REFERENCES words(id)
    );

    CREATE INDEX IF NOT EXISTS idx_words_next_repeat_time ON words(next_repeat_time);
    CREATE INDEX IF NOT EXISTS idx_words_history_word_id ON words_history(word_id);
    "#,
  )?;

  // Migration: weight was added after the first release
  add_column_if_missing(conn, "words", "weight", "REAL")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
