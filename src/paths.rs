//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `DATABASE_PATH`: Override the database file (see config.rs)

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
  DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database holding words and their review history
pub fn db_path() -> String {
  format!("{}/words.db", data_dir())
}

/// Plain-text file new words are dropped into for ingestion
pub fn input_path() -> String {
  format!("{}/input.txt", data_dir())
}

/// Default config file location, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";
