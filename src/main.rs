// Entry point of the cog-based Discord bot.
//
// **Architecture Overview:**
// - `core/` = Authorization rules, config, cog catalog and the lifecycle
//   state machine (platform-agnostic)
// - `infra/` = Loading config from disk
// - `discord/` = Discord-specific adapters (cogs, checks, client wiring)
//
// This file's job is to:
// 1. Load environment and configuration
// 2. Construct the bot (fails fast without DISCORD_TOKEN)
// 3. Run the startup hook and hand control to the gateway

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::discord::client;
use crate::infra::config::JsonConfigSource;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV_VAR: &str = "BOT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var(CONFIG_PATH_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = JsonConfigSource::new(config_path).load()?;

    // Construction and startup failures propagate and stop the process here.
    let bot = client::initialize_bot(&config)?;
    let outcome = client::launch(bot, Arc::new(config)).await?;

    tracing::info!(?outcome, "Bot exited");
    Ok(())
}
