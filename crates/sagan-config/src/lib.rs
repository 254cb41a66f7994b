//! # Sagan Configuration
//!
//! File-based configuration for the sagan tools.
//!
//! A configuration file controls three things:
//! - **decode**: which message sections buffer decoding keeps,
//! - **results**: how errors and malformations in results are handled,
//! - **logging**: level and output format.
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Files may be YAML, JSON or TOML; the extension picks the format.

use sagan_proto::DecodeOptions;
use sagan_result::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod logging;
pub mod results;

pub use logging::LoggingConfig;
pub use results::ResultsConfig;

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// File formats a configuration can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Picks the format from a file extension. Unknown extensions are YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sections kept when decoding buffers.
    pub decode: DecodeOptions,

    /// Handling of measurement results.
    pub results: ResultsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_str_as(&content, Format::from_path(path))
    }

    /// Parses configuration text in the given format.
    pub fn from_str_as(content: &str, format: Format) -> Result<Self> {
        let config = match format {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
            Format::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_str_as(yaml, Format::Yaml)
    }

    /// Loads the first file in `paths` that exists, or the defaults when
    /// none does.
    pub fn discover<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<(Self, Option<PathBuf>)> {
        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
            }
        }
        Ok((Self::default(), None))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()
    }

    /// Options for parsing measurement results.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            on_error: self.results.on_error,
            on_malformation: self.results.on_malformation,
            parse_buf: self.results.parse_buf,
            decode: self.decode,
        }
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sagan_result::Action;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = Config::default();
        config.results.on_error = Action::Fail;
        config.decode.authorities = false;

        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml("results:\n  on_malformation: ignore\nlogging:\n  level: debug\n").unwrap();
        assert_eq!(config.results.on_malformation, Action::Ignore);
        assert_eq!(config.results.on_error, Action::Warn);
        assert!(config.results.parse_buf);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.decode, DecodeOptions::ALL);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("sagan.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("sagan.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("sagan.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("sagan")), Format::Yaml);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[results]\nparse_buf = false\n\n[decode]\nadditionals = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.results.parse_buf);
        assert!(!config.decode.additionals);
        assert!(config.decode.answers);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"logging": {{"format": "json"}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_str_as(&text, Format::Toml).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(Config::from_file(&path), Err(ConfigError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("sagan.yaml");
        let second = dir.path().join("sagan.toml");
        std::fs::write(&second, "[logging]\nlevel = \"warn\"\n").unwrap();

        let (config, found) = Config::discover([&first, &second]).unwrap();
        assert_eq!(found.as_deref(), Some(second.as_path()));
        assert_eq!(config.logging.level, "warn");

        let (config, found) = Config::discover([&first]).unwrap();
        assert!(found.is_none());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Config::from_yaml("results: [1, 2"), Err(ConfigError::Yaml(_))));
        assert!(matches!(
            Config::from_yaml("results:\n  on_error: explode\n"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
