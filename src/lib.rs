pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod paths;
pub mod session;
pub mod srs;
