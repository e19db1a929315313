use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_STORAGE_KEY: &str = "shiftplan-config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Snapshots kept for undo, including the current one.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Start from the sample configuration instead of an empty one.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            storage_key: default_storage_key(),
            seed_defaults: default_true(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.max(1)
    }
}
