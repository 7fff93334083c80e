// Client wiring: intents, the poise framework, and the serenity session that
// `DiscordBot::run` drives.

use crate::core::config::BotConfig;
use crate::core::lifecycle::{
    BotError, BotOptions, BotToken, DiscordBot, RunOutcome, SessionError, SessionRunner,
};
use crate::discord::cogs::{CogRegistry, Command};
use crate::discord::{presence, Data, Error};
use async_trait::async_trait;
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Gateway intents: defaults plus message content (prefix commands) and
/// members (role lookups for the permission check).
pub fn gateway_intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
}

/// Build the bot from config. Fails if `DISCORD_TOKEN` is missing.
pub fn initialize_bot(config: &BotConfig) -> Result<DiscordBot, BotError> {
    let span = tracing::info_span!("bot", prefix = %config.prefix, cogs = config.cogs.len());
    DiscordBot::new(
        config,
        BotOptions {
            description: config.description.clone(),
        },
        span,
    )
}

/// Run the startup hook, then block on the gateway until the session ends.
///
/// Startup errors propagate. Whatever happens once connected is logged and
/// summarized in the returned `RunOutcome`.
pub async fn launch(mut bot: DiscordBot, config: Arc<BotConfig>) -> Result<RunOutcome, BotError> {
    let registry = CogRegistry::new();
    bot.setup_hook(&registry).await?;

    let data = Data {
        config: Arc::clone(&config),
        description: bot.options().description.clone(),
        lifecycle: bot.lifecycle(),
        loaded_cogs: bot.loaded_extensions().to_vec(),
        started_at: Utc::now(),
    };
    let framework = build_framework(bot.command_prefix(), registry.into_commands(), data);

    let runner = SerenitySession {
        intents: gateway_intents(),
        framework,
    };
    Ok(bot.run(runner).await)
}

fn build_framework(prefix: &str, commands: Vec<Command>, data: Data) -> poise::Framework<Data, Error> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix.to_string()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        command = %ctx.command().qualified_name,
                        user = %ctx.author().name,
                        "Received command"
                    );
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                // Fallible HTTP call; prefix commands keep working without it.
                let registration = poise::builtins::register_globally(ctx, commands);
                finish_setup(registration, commands.len(), data).await
            })
        })
        .build()
}

/// Always hands `data` back to poise. Without it the Ready handler never runs,
/// so a failed slash-command registration is only logged.
async fn finish_setup<F>(registration: F, count: usize, data: Data) -> Result<Data, Error>
where
    F: std::future::Future<Output = Result<(), ::serenity::Error>>,
{
    match registration.await {
        Ok(()) => tracing::info!(count, "Slash commands registered"),
        Err(e) => tracing::warn!(
            count,
            "Failed to register slash commands, continuing with prefix commands: {}",
            e
        ),
    }
    Ok(data)
}

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        // Fires again after every reconnect.
        serenity::FullEvent::Ready { data_about_bot } => {
            presence::on_ready(ctx, data_about_bot, &data.lifecycle).await;
        }
        serenity::FullEvent::Resume { .. } => {
            tracing::info!("Gateway session resumed");
        }
        _ => {}
    }

    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            tracing::warn!(
                command = %ctx.command().qualified_name,
                user_id = ctx.author().id.get(),
                "Permission denied"
            );
            if let Err(e) = ctx
                .say("🚫 Only the server owner, administrators, or Moderators can use this command.")
                .await
            {
                tracing::error!("Failed to send permission error: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                "Command failed: {}",
                error
            );
            if let Err(e) = ctx.say(format!("⚠️ {error}")).await {
                tracing::error!("Failed to send command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

struct SerenitySession {
    intents: serenity::GatewayIntents,
    framework: poise::Framework<Data, Error>,
}

#[async_trait]
impl SessionRunner for SerenitySession {
    async fn run(self, token: &BotToken) -> Result<(), SessionError> {
        let mut client = serenity::ClientBuilder::new(token.expose(), self.intents)
            .framework(self.framework)
            .await
            .map_err(classify_error)?;

        // serenity reconnects on its own; this only returns on shutdown or a
        // fatal error.
        client.start().await.map_err(classify_error)
    }
}

/// Gateway close code 4004 and HTTP 401 both mean the token was rejected.
fn classify_error(error: ::serenity::Error) -> SessionError {
    match &error {
        ::serenity::Error::Gateway(::serenity::gateway::GatewayError::InvalidAuthentication) => {
            SessionError::InvalidToken
        }
        ::serenity::Error::Http(http)
            if http.status_code().map(|status| status.as_u16()) == Some(401) =>
        {
            SessionError::InvalidToken
        }
        _ => SessionError::Other(error.to_string()),
    }
}
