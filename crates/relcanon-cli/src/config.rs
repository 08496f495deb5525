//! Configuration for the relcanon command line driver
//!
//! Loads configuration from:
//! 1. an optional YAML file - output and logging settings
//! 2. environment variables, which always override file values
//!
//! Command line flags are applied on top of both in `main`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// How canonical documents are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One document with every query: plans.json
    Combined,
    /// The first query paired with each later one: pair_<i>.json
    Pairs,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(OutputMode::Combined),
            "pairs" => Ok(OutputMode::Pairs),
            other => Err(other.to_string()),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,

    /// Directory the documents are written to
    pub directory: PathBuf,

    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Combined,
            directory: PathBuf::from("./out"),
            pretty: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Defaults with environment variable overrides, for runs without a config file
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(mode) = std::env::var("RELCANON_OUTPUT_MODE") {
            self.output.mode = mode.parse().map_err(|value| ConfigError::InvalidValue {
                var: "RELCANON_OUTPUT_MODE".to_string(),
                value,
            })?;
        }
        if let Ok(dir) = std::env::var("RELCANON_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }

        Ok(())
    }

    /// Set logging environment variables for the logging module
    pub fn apply_logging_env(&self) {
        std::env::set_var("RUST_LOG", &self.logging.level);
        std::env::set_var("LOG_FORMAT", &self.logging.format);
        std::env::set_var("LOG_OUTPUT", &self.logging.output);
        std::env::set_var("LOG_DIR", &self.logging.directory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.mode, OutputMode::Combined);
        assert_eq!(config.output.directory, PathBuf::from("./out"));
        assert!(config.output.pretty);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.output, "stdout");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config_yaml = r#"
output:
  pretty: false
"#;
        let config: Config = serde_yaml::from_str(config_yaml).unwrap();
        assert!(!config.output.pretty);
        assert_eq!(config.output.mode, OutputMode::Combined);
        assert_eq!(config.logging.directory, "./logs");
    }

    #[test]
    fn test_env_var_override() {
        std::env::set_var("RELCANON_OUTPUT_MODE", "pairs");
        std::env::set_var("RELCANON_OUTPUT_DIR", "/tmp/relcanon-out");

        let config_yaml = r#"
output:
  mode: combined
  directory: ./out
  pretty: true
logging:
  level: "info"
  format: "pretty"
  output: "stdout"
  directory: "./logs"
"#;
        let temp_file = std::env::temp_dir().join("relcanon_test_config.yaml");
        std::fs::write(&temp_file, config_yaml).unwrap();

        let config = Config::load(&temp_file);

        std::env::remove_var("RELCANON_OUTPUT_MODE");
        std::env::remove_var("RELCANON_OUTPUT_DIR");
        std::fs::remove_file(temp_file).ok();

        let config = config.unwrap();
        assert_eq!(config.output.mode, OutputMode::Pairs); // Overridden
        assert_eq!(config.output.directory, PathBuf::from("/tmp/relcanon-out")); // Overridden
        assert!(config.output.pretty);
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("PAIRS".parse::<OutputMode>().unwrap(), OutputMode::Pairs);
        assert_eq!("combined".parse::<OutputMode>().unwrap(), OutputMode::Combined);
        assert_eq!("both".parse::<OutputMode>().unwrap_err(), "both");
    }
}
