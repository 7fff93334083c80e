// Discord layer - cogs, command guards, presence and client wiring.

#[path = "cogs/cog_registry.rs"]
pub mod cogs;

pub mod checks;
pub mod client;
pub mod presence;

use crate::core::cogs::CogId;
use crate::core::config::BotConfig;
use crate::core::lifecycle::Lifecycle;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub description: String,
    pub lifecycle: Arc<Lifecycle>,
    pub loaded_cogs: Vec<CogId>,
    pub started_at: DateTime<Utc>,
}
