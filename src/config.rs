//! Parser configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Treat the stream as UTF-8: shifts and charset designations are no-ops
    pub use_utf8: bool,
    /// Maximum OSC payload length in characters; longer payloads fault
    pub max_osc_len: Option<usize>,
    /// Maximum number of positional parameters in a CSI sequence; more fault
    pub max_params: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            use_utf8: true,
            max_osc_len: None,
            max_params: None,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ParserConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
