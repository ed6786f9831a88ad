use chrono::Utc;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use word_repeat::config::{AppConfig, PRACTICE_SAMPLE_SIZE};
use word_repeat::db::SqliteWordStore;
use word_repeat::domain::ReviewResults;
use word_repeat::error::Result;
use word_repeat::session;

const USAGE: &str =
  "usage: word_repeat <review | submit <results.json> | practice [count] | ingest | history <word-id>>";

#[derive(Debug, PartialEq)]
enum Command {
  Review,
  Submit(PathBuf),
  Practice(usize),
  Ingest,
  History(i64),
}

impl Command {
  /// None when the arguments do not form a known command
  fn parse(args: &[String]) -> Option<Self> {
    match args.first().map(String::as_str) {
      Some("review") | None => Some(Self::Review),
      Some("submit") => args.get(1).map(|path| Self::Submit(PathBuf::from(path))),
      Some("practice") => match args.get(1) {
        Some(count) => count.parse().ok().map(Self::Practice),
        None => Some(Self::Practice(PRACTICE_SAMPLE_SIZE)),
      },
      Some("ingest") => Some(Self::Ingest),
      Some("history") => args.get(1)?.parse().ok().map(Self::History),
      Some(_) => None,
    }
  }
}

fn run(command: Command) -> Result<()> {
  let config = AppConfig::load()?;
  let store = SqliteWordStore::open(&config.database_path(), config.weights.default_weight)?;
  let now = Utc::now();

  match command {
    Command::Review => {
      let review = session::start_review(&store, &config, &config.input_path(), now, &mut rand::rng())?;
      println!("{}", serde_json::to_string_pretty(&review)?);
    }
    Command::Submit(path) => {
      let json = std::fs::read_to_string(&path)?;
      let results = ReviewResults::from_json(&json)?;
      let report = session::submit_results(&store, &config, &results, now)?;
      for dropped in &report.dropped {
        eprintln!("skipped unknown word {}", dropped);
      }
    }
    Command::Practice(count) => {
      let words = session::practice_words(&store, count, &mut rand::rng())?;
      println!("{}", serde_json::to_string_pretty(&words)?);
    }
    Command::Ingest => {
      let report = session::ingest_input(&store, &config, &config.input_path(), now)?;
      println!("imported {} words", report.created.len());
    }
    Command::History(word_id) => {
      let history = store.history_for(word_id)?;
      println!("{}", serde_json::to_string_pretty(&history)?);
    }
  }
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "word_repeat=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let args: Vec<String> = std::env::args().skip(1).collect();
  let Some(command) = Command::parse(&args) else {
    eprintln!("{}", USAGE);
    return ExitCode::FAILURE;
  };

  match run(command) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}
