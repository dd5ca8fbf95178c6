//! Configuration module
//!
//! Reader/writer dialect defaults, JSON export settings and logging setup,
//! loaded from a TOML file in the user's config directory.

pub mod config;

pub use config::{Config, CsvConfig, JsonConfig, LoggingConfig};
