// Lifecycle controller - owns the phase state machine and the two hooks the
// Discord client drives: the startup hook (load cogs) and the ready event
// (log identity, pick presence).
//
// The controller never touches Discord directly. Loading a cog goes through
// the `ExtensionLoader` port and the network session through `SessionRunner`,
// so both can be mocked in tests.

use super::bot_instance::BotToken;
use super::lifecycle_models::{
    BotError, ExtensionError, LifecycleEvent, Phase, Presence, ReadyInfo, SessionError,
};
use crate::core::cogs::CogId;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::Span;

// ============================================================================
// PORTS
// ============================================================================

/// Loads a single cog into the command framework.
#[async_trait]
pub trait ExtensionLoader: Send + Sync {
    async fn load_extension(&self, cog: CogId) -> Result<(), ExtensionError>;
}

/// Runs the network session until it ends. Reconnects are the runner's job.
#[async_trait]
pub trait SessionRunner: Send {
    async fn run(self, token: &BotToken) -> Result<(), SessionError>;
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct Lifecycle {
    phase: Mutex<Phase>,
    command_prefix: String,
    span: Span,
}

impl Lifecycle {
    /// All lifecycle logging is emitted under `span`.
    pub fn new(command_prefix: impl Into<String>, span: Span) -> Self {
        Self {
            phase: Mutex::new(Phase::Constructed),
            command_prefix: command_prefix.into(),
            span,
        }
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.lock().await
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub async fn advance(&self, event: LifecycleEvent) -> Result<Phase, BotError> {
        let mut phase = self.phase.lock().await;
        let from = *phase;
        let next = from
            .next(event)
            .ok_or(BotError::InvalidTransition { from, event })?;

        tracing::debug!(parent: &self.span, ?from, to = ?next, ?event, "Lifecycle transition");
        *phase = next;
        Ok(next)
    }

    /// Like `advance`, but a refused transition is only logged.
    async fn advance_or_warn(&self, event: LifecycleEvent) {
        if let Err(e) = self.advance(event).await {
            tracing::warn!(parent: &self.span, "{}", e);
        }
    }

    /// Startup hook: load every named cog in order, one at a time.
    ///
    /// The first failure aborts startup; later cogs are never attempted.
    pub async fn load_extensions<L: ExtensionLoader + ?Sized>(
        &self,
        names: &[String],
        loader: &L,
    ) -> Result<Vec<CogId>, BotError> {
        self.advance(LifecycleEvent::StartupHook).await?;

        let mut loaded = Vec::with_capacity(names.len());
        for name in names {
            let result = match name.parse::<CogId>() {
                Ok(cog) => loader.load_extension(cog).await.map(|()| cog),
                Err(e) => Err(ExtensionError::from(e)),
            };

            match result {
                Ok(cog) => {
                    tracing::info!(parent: &self.span, %cog, "Loaded cog: {}", name);
                    loaded.push(cog);
                }
                Err(source) => {
                    tracing::error!(
                        parent: &self.span,
                        cog = %name,
                        error = %source,
                        "Error loading cogs"
                    );
                    self.advance_or_warn(LifecycleEvent::Failed).await;
                    return Err(BotError::ExtensionLoad {
                        name: name.clone(),
                        source,
                    });
                }
            }
        }

        tracing::info!(parent: &self.span, count = loaded.len(), "Bot setup complete");
        Ok(loaded)
    }

    /// Ready event. Fires again after every reconnect and must stay harmless.
    pub async fn on_ready(&self, info: &ReadyInfo) -> Presence {
        tracing::info!(
            parent: &self.span,
            "Logged in as {} (ID: {})",
            info.user_name,
            info.user_id
        );
        tracing::info!(parent: &self.span, "Connected to {} guild(s)", info.guild_count);

        self.advance_or_warn(LifecycleEvent::ReadyReceived).await;
        Presence::help_hint(&self.command_prefix)
    }

    /// Called by the Discord layer once the presence from `on_ready` is set.
    pub async fn presence_applied(&self) {
        self.advance_or_warn(LifecycleEvent::PresenceApplied).await;
    }

    pub(crate) async fn session_closed(&self) {
        self.advance_or_warn(LifecycleEvent::SessionClosed).await;
    }

    pub(crate) async fn failed(&self) {
        self.advance_or_warn(LifecycleEvent::Failed).await;
    }
}
