// Moderation cog. Every command here is gated on owner/admin/moderator.

use super::Command;
use crate::discord::checks::is_admin_owner_mod;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const MAX_PURGE: u8 = 100;

pub fn commands() -> Vec<Command> {
    vec![kick(), ban(), purge()]
}

fn reason_or_default(reason: Option<String>) -> String {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "No reason provided".to_string())
}

/// Kick a member from the server.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] user: serenity::User,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    if user.id == ctx.author().id {
        ctx.say("You can't kick yourself.").await?;
        return Ok(());
    }

    let reason = reason_or_default(reason);
    guild_id
        .kick_with_reason(ctx.http(), user.id, &reason)
        .await?;

    tracing::info!(
        guild_id = guild_id.get(),
        target = user.id.get(),
        moderator = ctx.author().id.get(),
        "Member kicked"
    );
    ctx.say(format!("👢 Kicked **{}**: {}", user.name, reason))
        .await?;
    Ok(())
}

/// Ban a member from the server.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] user: serenity::User,
    #[description = "Days of messages to delete (0-7)"] delete_days: Option<u8>,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    if user.id == ctx.author().id {
        ctx.say("You can't ban yourself.").await?;
        return Ok(());
    }

    let reason = reason_or_default(reason);
    let delete_days = delete_days.unwrap_or(0).min(7);
    guild_id
        .ban_with_reason(ctx.http(), user.id, delete_days, &reason)
        .await?;

    tracing::info!(
        guild_id = guild_id.get(),
        target = user.id.get(),
        moderator = ctx.author().id.get(),
        delete_days,
        "Member banned"
    );
    ctx.say(format!("🔨 Banned **{}**: {}", user.name, reason))
        .await?;
    Ok(())
}

/// Delete recent messages in this channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_admin_owner_mod",
    aliases("clear")
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "How many messages (1-100)"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    if amount == 0 || amount > MAX_PURGE {
        ctx.say(format!("Pick a number between 1 and {MAX_PURGE}."))
            .await?;
        return Ok(());
    }

    let channel_id = ctx.channel_id();
    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(amount))
        .await?;

    let mut deleted = 0usize;
    for message in &messages {
        match channel_id.delete_message(ctx.http(), message.id).await {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!("Failed to delete message {}: {}", message.id, e),
        }
    }

    ctx.say(format!("🧹 Deleted {deleted} message(s).")).await?;
    Ok(())
}
