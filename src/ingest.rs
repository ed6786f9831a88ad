//! Import of new words from a plain-text drop file.
//!
//! One entry per line:
//!
//! ```text
//! word (pos) = translation; example; another example
//! ```
//!
//! The `(pos)` tag is optional. Lines without `=` are ignored.

use std::fs;
use std::path::Path;

use crate::domain::{NewWord, ReviewResults};

/// Pull a `(letters)` tag out of the word part, returning the remaining text
/// and the tag.
fn split_part_of_speech(raw: &str) -> (String, Option<String>) {
  let mut search_from = 0;
  while let Some(open) = raw[search_from..].find('(').map(|i| i + search_from) {
    if let Some(close) = raw[open..].find(')').map(|i| i + open) {
      let tag = &raw[open + 1..close];
      if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic()) {
        let rest = format!("{}{}", &raw[..open], &raw[close + 1..]);
        return (rest, Some(tag.to_string()));
      }
    }
    search_from = open + 1;
  }
  (raw.to_string(), None)
}

/// Parse a single input line
pub fn parse_line(line: &str) -> Option<NewWord> {
  let mut parts = line.split('=');
  let word_part = parts.next()?;
  let definition = parts.next()?;

  let (text, part_of_speech) = split_part_of_speech(word_part);
  let text = text.trim().to_lowercase();
  if text.is_empty() {
    return None;
  }

  let mut segments = definition.split(';');
  let translation = segments.next().unwrap_or_default().trim().to_string();
  let example = segments
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();

  Some(NewWord {
    text,
    translation,
    part_of_speech: part_of_speech.map(|p| p.replace('.', "")),
    example,
  })
}

/// Parse all lines of an input document
pub fn parse_input(contents: &str) -> Vec<NewWord> {
  contents.lines().filter_map(parse_line).collect()
}

/// Read the drop file and turn its entries into insertions.
///
/// A missing file means nothing to import. The file is left as is; call
/// [`clear_input`] once the words are stored.
pub fn read_input(path: &Path) -> std::io::Result<ReviewResults> {
  if !path.exists() {
    return Ok(ReviewResults::default());
  }

  let words = parse_input(&fs::read_to_string(path)?);
  if !words.is_empty() {
    tracing::info!("Importing {} words from {}", words.len(), path.display());
  }
  Ok(words.into_iter().fold(ReviewResults::default(), ReviewResults::new_word))
}

/// Empty the drop file so its entries are not imported twice
pub fn clear_input(path: &Path) -> std::io::Result<()> {
  if path.exists() {
    fs::write(path, "")?;
  }
  Ok(())
}
