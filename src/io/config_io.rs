use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::{BoardConfig, is_valid_speed};

/// Error type for reading taskboard.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value in {path}: {key} = {value} ({reason})")]
    InvalidValue {
        path: PathBuf,
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Read the board config. A missing file means defaults.
pub fn read_config(path: &Path) -> Result<BoardConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BoardConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !is_valid_speed(config.scroll.speed) {
        return Err(ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key: "scroll.speed",
            value: config.scroll.speed.to_string(),
            reason: "must be a positive number",
        });
    }
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<BoardConfig, toml::de::Error> {
    toml::from_str(text)
}
