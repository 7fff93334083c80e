// The core module contains all platform-agnostic logic.
// Each concern gets its own submodule.

#[path = "auth/authorization.rs"]
pub mod auth;

#[path = "cogs/cog_catalog.rs"]
pub mod cogs;

#[path = "config/bot_config.rs"]
pub mod config;

#[path = "lifecycle/mod.rs"]
pub mod lifecycle;
