// Administration cog: presence overrides, loaded cog listing and shutdown.

use super::Command;
use crate::core::lifecycle::Presence;
use crate::discord::checks::is_admin_owner_mod;
use crate::discord::presence;
use crate::discord::{Context, Error};

pub fn commands() -> Vec<Command> {
    vec![setstatus(), resetstatus(), cogs(), shutdown()]
}

/// Override the bot's "playing" status.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn setstatus(
    ctx: Context<'_>,
    #[description = "Status text"]
    #[rest]
    text: String,
) -> Result<(), Error> {
    let text = text.trim();
    if text.is_empty() {
        ctx.say("Status text can't be empty.").await?;
        return Ok(());
    }

    presence::apply(ctx.serenity_context(), &Presence::playing(text));
    ctx.say(format!("✅ Status set to **Playing {text}**."))
        .await?;
    Ok(())
}

/// Restore the default "listening to help" status.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn resetstatus(ctx: Context<'_>) -> Result<(), Error> {
    let default = Presence::help_hint(ctx.data().lifecycle.command_prefix());
    presence::apply(ctx.serenity_context(), &default);
    ctx.say(format!("✅ Status reset to **Listening to {}**.", default.text))
        .await?;
    Ok(())
}

/// List the cogs loaded at startup.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn cogs(ctx: Context<'_>) -> Result<(), Error> {
    let lines = ctx
        .data()
        .loaded_cogs
        .iter()
        .enumerate()
        .map(|(i, cog)| format!("{}. `{}` ({})", i + 1, cog, cog.display_name()))
        .collect::<Vec<_>>()
        .join("\n");

    ctx.say(format!("⚙️ Loaded cogs:\n{lines}")).await?;
    Ok(())
}

/// Disconnect and stop the bot.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    tracing::info!(
        user_id = ctx.author().id.get(),
        "Shutdown requested"
    );
    ctx.say("👋 Shutting down.").await?;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
