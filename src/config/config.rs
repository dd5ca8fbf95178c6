use crate::data::csv_loader::CsvOptions;
use crate::data::error::TreeError;
use crate::data::json_bridge::export_json;
use crate::data::store::Store;
use crate::data::text_encoding::TextEncoding;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv: CsvConfig,
    pub json: JsonConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Single ASCII field separator
    pub delimiter: char,

    /// "utf-8" or "latin-1"
    pub encoding: String,

    /// Treat the first row as column names
    pub has_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Spaces per indentation level for JSON export
    pub indent: usize,
}

impl JsonConfig {
    /// Export `store` to `path` using the configured indentation
    pub fn export(&self, store: &Store, path: &Path) -> Result<usize, TreeError> {
        export_json(store, path, self.indent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by RUST_LOG
    pub filter: String,

    /// Diagnostics kept in memory
    pub buffer_size: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            encoding: "utf-8".to_string(),
            has_header: true,
        }
    }
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            buffer_size: 1000,
        }
    }
}

impl CsvConfig {
    /// Validate and convert to reader/writer options
    pub fn to_options(&self) -> Result<CsvOptions> {
        if !self.delimiter.is_ascii() {
            return Err(anyhow!(
                "Delimiter {:?} is not a single-byte ASCII character",
                self.delimiter
            ));
        }
        let encoding: TextEncoding = self.encoding.parse().map_err(|e: String| anyhow!(e))?;

        Ok(CsvOptions {
            delimiter: self.delimiter as u8,
            encoding,
            has_header: self.has_header,
        })
    }
}

impl Config {
    /// Load from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::get_config_path()?)
    }

    /// Load `path`, first writing the commented default file if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, Self::create_default_with_comments())
                .with_context(|| format!("Failed to write config file: {:?}", path))?;
        }

        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        // Surface bad dialect settings at load time rather than on first read
        config.csv.to_options()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("tabkit").join("config.toml"))
    }

    pub fn create_default_with_comments() -> String {
        r#"# tabkit configuration file
# Location: ~/.config/tabkit/config.toml (Linux)
#           ~/Library/Application Support/tabkit/config.toml (macOS)
#           %APPDATA%\tabkit\config.toml (Windows)

[csv]
# Field separator, must be a single ASCII character
delimiter = ","

# Text encoding of delimited files: "utf-8" or "latin-1"
encoding = "utf-8"

# Treat the first row as column names
has_header = true

[json]
# Spaces per indentation level when exporting JSON
indent = 2

[logging]
# tracing filter directive (RUST_LOG takes precedence)
filter = "info"

# Number of diagnostics kept in memory
buffer_size = 1000
"#
        .to_string()
    }
}
