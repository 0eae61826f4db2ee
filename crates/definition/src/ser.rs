use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid RON: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("failed to write RON: {0}")]
    RonWrite(#[from] ron::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text formats a graph definition or a layout snapshot can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Ron,
    Json,
}

impl Format {
    /// Guess the format from a file extension, `None` if unknown
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ron" => Some(Format::Ron),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, input: &str) -> Result<T, DefinitionError> {
        debug!("Parsing {} bytes as {self:?}", input.len());
        Ok(match self {
            Format::Ron => ron::from_str(input)?,
            Format::Json => serde_json::from_str(input)?,
        })
    }

    pub fn write<T: Serialize>(self, value: &T) -> Result<String, DefinitionError> {
        Ok(match self {
            Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?,
            Format::Json => serde_json::to_string_pretty(value)?,
        })
    }
}
