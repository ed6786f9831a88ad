//! Application configuration.
//!
//! Values are read once from `config.toml` at startup and passed explicitly
//! to each component; nothing here is global.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SrsError};
use crate::paths;

/// Number of distractors shown next to the correct answer
pub const DISTRACTOR_COUNT: usize = 3;

/// Number of options in one multiple-choice item
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Default number of words sampled for practice material
pub const PRACTICE_SAMPLE_SIZE: usize = 20;

// ==================== Config file structure ====================

/// Configuration file structure for config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub database: DatabaseConfig,
  pub review: ReviewConfig,
  pub weights: WeightConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
  pub path: Option<String>,
}

/// Review batch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
  /// Maximum number of words served in one review batch
  pub words_per_try: usize,
  /// File scanned for new words before each review
  pub input_path: Option<String>,
}

impl Default for ReviewConfig {
  fn default() -> Self {
    Self {
      words_per_try: 10,
      input_path: None,
    }
  }
}

/// Tuning constants for the priority weight
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
  pub default_weight: f64,
  /// Multiplier applied (after the +1 offset) on failure
  pub weight_increase_fail: f64,
  /// Multiplier applied on success
  pub weight_decrease_success: f64,
  pub max_weight: f64,
  pub min_weight: f64,
}

impl Default for WeightConfig {
  fn default() -> Self {
    Self {
      default_weight: 1.0,
      weight_increase_fail: 1.5,
      weight_decrease_success: 0.8,
      max_weight: 10.0,
      min_weight: 0.1,
    }
  }
}

impl WeightConfig {
  pub fn validate(&self) -> Result<(), SrsError> {
    if !(self.min_weight > 0.0 && self.min_weight <= self.max_weight) {
      return Err(SrsError::InvalidConfig(format!(
        "weight bounds [{}, {}] are not a positive range",
        self.min_weight, self.max_weight
      )));
    }
    if self.weight_increase_fail <= 0.0 || self.weight_decrease_success <= 0.0 {
      return Err(SrsError::InvalidConfig(
        "weight factors must be positive".to_string(),
      ));
    }
    if !(self.min_weight..=self.max_weight).contains(&self.default_weight) {
      return Err(SrsError::InvalidConfig(format!(
        "default_weight {} is outside [{}, {}]",
        self.default_weight, self.min_weight, self.max_weight
      )));
    }
    Ok(())
  }

  /// Clamp a weight into the configured bounds
  pub fn clamp(&self, weight: f64) -> f64 {
    weight.clamp(self.min_weight, self.max_weight)
  }
}

impl AppConfig {
  /// Parse a config document and validate it
  pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  /// Read and validate the config file at `path`
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_toml(&contents)
  }

  /// Load `config.toml` from the working directory, falling back to defaults
  /// when the file does not exist.
  pub fn load() -> Result<Self, ConfigError> {
    let path = Path::new(paths::CONFIG_FILE);
    if path.exists() {
      tracing::info!("Using configuration from {}", path.display());
      Self::from_file(path)
    } else {
      tracing::info!("No {} found, using defaults", paths::CONFIG_FILE);
      Ok(Self::default())
    }
  }

  pub fn validate(&self) -> Result<(), SrsError> {
    if self.review.words_per_try == 0 {
      return Err(SrsError::InvalidConfig(
        "words_per_try must be at least 1".to_string(),
      ));
    }
    self.weights.validate()
  }

  /// Database path with priority: config.toml > .env / DATABASE_PATH > default
  pub fn database_path(&self) -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    if let Some(path) = &self.database.path {
      tracing::info!("Using database from config.toml: {}", path);
      return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("DATABASE_PATH") {
      tracing::info!("Using database from DATABASE_PATH env: {}", path);
      return PathBuf::from(path);
    }

    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
  }

  /// Input file path with priority: config.toml > default
  pub fn input_path(&self) -> PathBuf {
    self
      .review
      .input_path
      .as_ref()
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(paths::input_path()))
  }
}
