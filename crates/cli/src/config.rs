use anyhow::{Context, Result};
use portlay_definition::Format;
use portlay_layout::{DiagonalLayout, GraphStyle, SugiyamaLayout};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Settings read from a RON file, every section optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: GraphStyle,
    pub layout: SugiyamaLayout,
    pub diagonal: DiagonalLayout,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = Format::Ron
            .parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
