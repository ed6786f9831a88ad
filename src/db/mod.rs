pub mod history;
pub mod schema;
pub mod words;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{HistoryEntry, Word};
use crate::error::StoreError;

pub use history::{get_word_history, insert_history};
pub use schema::run_migrations;
pub use words::{get_all_words, upsert_word};

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }
}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, StoreError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    StoreError::Lock
  })
}

pub fn init_db(path: &Path) -> Result<DbPool, StoreError> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    std::fs::copy(path, &backup_path).log_warn("Could not create database backup");
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Source and sink of the word collection.
///
/// The scheduling core never talks to storage itself: callers load a full
/// snapshot, run the core, then hand the resulting collection back here.
pub trait WordStore {
  /// Every tracked word with its current scheduling state
  fn load_words(&self) -> Result<Vec<Word>, StoreError>;

  /// Write the collection back, inserting new words and overwriting
  /// changed ones. Words absent from `words` are left untouched.
  fn save_words(&self, words: &[Word]) -> Result<(), StoreError>;

  /// Append outcome records to the history log
  fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteWordStore {
  pool: DbPool,
  default_weight: f64,
}

impl SqliteWordStore {
  pub fn new(pool: DbPool, default_weight: f64) -> Self {
    Self { pool, default_weight }
  }

  /// Open (and migrate) the database at `path`
  pub fn open(path: &Path, default_weight: f64) -> Result<Self, StoreError> {
    Ok(Self::new(init_db(path)?, default_weight))
  }

  /// Fresh in-memory database
  pub fn in_memory(default_weight: f64) -> Result<Self, StoreError> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Self::new(Arc::new(Mutex::new(conn)), default_weight))
  }

  /// Outcome history of one word, oldest first
  pub fn history_for(&self, word_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
    let conn = try_lock(&self.pool)?;
    get_word_history(&conn, word_id)
  }
}

impl WordStore for SqliteWordStore {
  fn load_words(&self) -> Result<Vec<Word>, StoreError> {
    let conn = try_lock(&self.pool)?;
    get_all_words(&conn, self.default_weight)
  }

  fn save_words(&self, words: &[Word]) -> Result<(), StoreError> {
    let mut conn = try_lock(&self.pool)?;
    let tx = conn.transaction()?;
    for word in words {
      upsert_word(&tx, word)?;
    }
    tx.commit()?;
    tracing::debug!("Saved {} words", words.len());
    Ok(())
  }

  fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
    let mut conn = try_lock(&self.pool)?;
    let tx = conn.transaction()?;
    for entry in entries {
      insert_history(&tx, entry)?;
    }
    tx.commit()?;
    Ok(())
  }
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryWordStore {
  words: Mutex<Vec<Word>>,
  history: Mutex<Vec<HistoryEntry>>,
}

impl MemoryWordStore {
  pub fn new(words: Vec<Word>) -> Self {
    Self {
      words: Mutex::new(words),
      history: Mutex::new(Vec::new()),
    }
  }

  pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
    Ok(self.history.lock().map_err(|_| StoreError::Lock)?.clone())
  }
}

impl WordStore for MemoryWordStore {
  fn load_words(&self) -> Result<Vec<Word>, StoreError> {
    Ok(self.words.lock().map_err(|_| StoreError::Lock)?.clone())
  }

  fn save_words(&self, words: &[Word]) -> Result<(), StoreError> {
    let mut stored = self.words.lock().map_err(|_| StoreError::Lock)?;
    for word in words {
      match stored.iter_mut().find(|w| w.id == word.id) {
        Some(existing) => *existing = word.clone(),
        None => stored.push(word.clone()),
      }
    }
    Ok(())
  }

  fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
    self
      .history
      .lock()
      .map_err(|_| StoreError::Lock)?
      .extend_from_slice(entries);
    Ok(())
  }
}
