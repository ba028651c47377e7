use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Tolerance '{name}' must be a positive number, got {value}")]
    InvalidTolerance { name: &'static str, value: f32 },
}

/// Spatial tolerances used to snap tokens into rows and columns.
///
/// Both are absolute pixel distances tuned on table crops rendered at the
/// usual scan resolution. Retune them if the renderer's DPI changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Max distance between a value's top edge and its row label's top edge.
    pub row_tolerance: f32,
    /// Max distance between a value's left edge and a year header's left edge.
    pub column_tolerance: f32,
    /// Substrings marking a `name` token as a note reference (case-insensitive).
    pub note_markers: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 10.0,
            column_tolerance: 50.0,
            note_markers: vec!["cp-".to_string(), "p-".to_string()],
        }
    }
}

impl ExtractionConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: ExtractionConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("row_tolerance", self.row_tolerance),
            ("column_tolerance", self.column_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }
}
