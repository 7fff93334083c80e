use crate::core::config::{BotConfig, ConfigError};
use std::path::PathBuf;

/// Reads `BotConfig` from a JSON file. A missing file means "use defaults".
pub struct JsonConfigSource {
    path: PathBuf,
}

impl JsonConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<BotConfig, ConfigError> {
        if !self.path.exists() {
            tracing::info!(
                path = %self.path.display(),
                "No config file found, using defaults"
            );
            return Ok(BotConfig::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let config = BotConfig::from_json(&raw)?;
        tracing::info!(
            path = %self.path.display(),
            cogs = config.cogs.len(),
            "Loaded config"
        );
        Ok(config)
    }
}
