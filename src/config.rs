//! Configuration management for serline.
//!
//! Settings are read from `~/.serline/config.toml`; anything missing falls
//! back to its default, and an unreadable file means all defaults.
//!
//! # Configuration File
//!
//! ```toml
//! # Edit buffer size in bytes, including the terminating slot
//! capacity = 256
//!
//! # Echo typed characters back to the terminal
//! echo = true
//!
//! prompt = "> "
//!
//! # Send CR LF for every LF echoed (needed when the terminal is in raw mode)
//! translate_newline = true
//!
//! # trace, debug, info, warn, error
//! log_level = "info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edit buffer capacity, sentinel slot included
    pub capacity: usize,
    /// Initial echo setting
    pub echo: bool,
    /// Prompt printed before each line
    pub prompt: String,
    /// LF -> CR LF on output in interactive mode
    pub translate_newline: bool,
    /// Log level for the log file
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 256,
            echo: true,
            prompt: "> ".to_string(),
            translate_newline: true,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config path")]
    NoPath,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        let Some(path) = Self::get_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoPath)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Directory holding config and log files
    pub fn get_config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".serline"))
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|dir| dir.join("config.toml"))
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.capacity, 256);
        assert!(config.echo);
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("capacity = 80\necho = false\n").unwrap();
        assert_eq!(config.capacity, 80);
        assert!(!config.echo);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(matches!(
            Config::parse("capacity = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            prompt: "lua> ".to_string(),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
