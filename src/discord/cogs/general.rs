// General cog: ping, help and about.
//
// `help` replaces a framework default so the listing can be grouped by cog
// and show the configured prefix.

use super::Command;
use crate::discord::{Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

pub fn commands() -> Vec<Command> {
    vec![ping(), help(), about()]
}

/// Check that the bot is alive.
#[poise::command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    ctx.say(format!("🏓 Pong! Gateway latency: {} ms", latency.as_millis()))
        .await?;
    Ok(())
}

/// List the available commands, or show details for one.
#[poise::command(prefix_command, slash_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show details for"] command: Option<String>,
) -> Result<(), Error> {
    let prefix = ctx.data().config.prefix.clone();
    let commands = &ctx.framework().options().commands;

    let embed = match command {
        Some(name) => {
            let Some(found) = find_command(commands, &name) else {
                ctx.say(format!(
                    "❓ No command named `{name}`. Try `{prefix}help` for the full list."
                ))
                .await?;
                return Ok(());
            };

            serenity::CreateEmbed::new()
                .title(format!("{prefix}{}", found.name))
                .description(
                    found
                        .description
                        .clone()
                        .unwrap_or_else(|| "No description.".to_string()),
                )
                .color(0x5865F2)
        }
        None => {
            let mut embed = serenity::CreateEmbed::new()
                .title("📖 Commands")
                .description(format!(
                    "Use `{prefix}help <command>` for details on a single command."
                ))
                .color(0x5865F2);

            for (category, body) in help_sections(&prefix, commands) {
                embed = embed.field(category, body, false);
            }
            embed
        }
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show what this bot is and how long it has been up.
#[poise::command(prefix_command, slash_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let uptime = format_uptime(Utc::now() - data.started_at);
    let cogs = data
        .loaded_cogs
        .iter()
        .map(|cog| format!("`{cog}`"))
        .collect::<Vec<_>>()
        .join(", ");

    let phase = data.lifecycle.phase().await;

    let embed = serenity::CreateEmbed::new()
        .title("🤖 About")
        .description(data.description.clone())
        .color(0x5865F2)
        .field("Prefix", format!("`{}`", data.config.prefix), true)
        .field("Uptime", uptime, true)
        .field("Status", format!("{phase:?}"), true)
        .field("Cogs", cogs, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn find_command<'a>(commands: &'a [Command], name: &str) -> Option<&'a Command> {
    let name = name.trim_start_matches('/').to_lowercase();
    commands
        .iter()
        .filter(|c| !c.hide_in_help)
        .find(|c| c.name == name || c.aliases.iter().any(|a| *a == name))
}

/// Group visible commands by category, keeping the order cogs were loaded in.
fn help_sections(prefix: &str, commands: &[Command]) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();

    for command in commands.iter().filter(|c| !c.hide_in_help) {
        let category = command
            .category
            .clone()
            .unwrap_or_else(|| "Other".to_string());
        let line = match &command.description {
            Some(description) => format!("`{prefix}{}` - {description}", command.name),
            None => format!("`{prefix}{}`", command.name),
        };

        match sections.iter_mut().find(|(name, _)| *name == category) {
            Some((_, body)) => {
                body.push('\n');
                body.push_str(&line);
            }
            None => sections.push((category, line)),
        }
    }

    sections
}

fn format_uptime(uptime: chrono::Duration) -> String {
    let total = uptime.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}
