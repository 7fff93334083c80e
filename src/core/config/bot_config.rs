// Static bot configuration: which cogs to load, the command prefix and the
// description shown by `about`. Loaded once at startup and read-only after.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_DESCRIPTION: &str = "A modular Discord bot built from pluggable cogs.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Cog names, loaded in this order.
    #[serde(alias = "COGS")]
    pub cogs: Vec<String>,
    #[serde(alias = "PREFIX")]
    pub prefix: String,
    #[serde(alias = "DESCRIPTION")]
    pub description: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            cogs: vec![
                "general".to_string(),
                "moderation".to_string(),
                "fun".to_string(),
                "admin".to_string(),
            ],
            prefix: DEFAULT_PREFIX.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl BotConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
