//! CLI configuration
//!
//! Layered, lowest precedence first:
//! 1. built-in defaults
//! 2. optional TOML file (`--config`, else `ipehr-aql.toml` in the working directory)
//! 3. `IPEHR_AQL__SECTION__KEY` environment variables (a `.env` file is loaded first)
//! 4. command-line flags, applied by the caller

use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_FILE: &str = "ipehr-aql.toml";
const ENV_PREFIX: &str = "IPEHR_AQL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the ipehr crates when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// `daily`, `hourly`, `minutely` or `never`
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "ipehr-aql".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Deadline for one query execution
    pub timeout_ms: Option<u64>,
    /// Row limit applied when neither the request nor the flags set one
    pub fetch: Option<usize>,
}

impl Config {
    /// Load configuration from the optional file and the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        const ROTATIONS: [&str; 4] = ["daily", "hourly", "minutely", "never"];
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(format!("unknown logging.level '{}'", self.logging.level));
        }
        if self.logging.file_enabled && !ROTATIONS.contains(&self.logging.file_rotation.as_str()) {
            return Err(format!(
                "unknown logging.file_rotation '{}', expected one of {}",
                self.logging.file_rotation,
                ROTATIONS.join(", ")
            ));
        }
        if self.query.timeout_ms == Some(0) {
            return Err("query.timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}
