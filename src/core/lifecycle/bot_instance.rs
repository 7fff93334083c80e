// The bot instance: token, prefix, configured cogs and the lifecycle that
// drives them. Construction fails fast without a token so nothing can ever
// try to connect with one.

use super::lifecycle_models::{BotError, RunOutcome, SessionError};
use super::lifecycle_service::{ExtensionLoader, Lifecycle, SessionRunner};
use crate::core::cogs::CogId;
use crate::core::config::BotConfig;
use std::sync::Arc;
use tracing::Span;

pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

/// Discord bot token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BotToken(***)")
    }
}

/// Free-form construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotOptions {
    /// Shown by the `about` command.
    pub description: String,
}

pub struct DiscordBot {
    token: BotToken,
    command_prefix: String,
    options: BotOptions,
    cogs: Vec<String>,
    loaded_extensions: Vec<CogId>,
    lifecycle: Arc<Lifecycle>,
}

impl DiscordBot {
    /// Build the bot, reading the token from `DISCORD_TOKEN`. Every lifecycle
    /// event is logged under `span`.
    pub fn new(config: &BotConfig, options: BotOptions, span: Span) -> Result<Self, BotError> {
        Self::with_token(config, options, std::env::var(TOKEN_ENV_VAR).ok(), span)
    }

    pub fn with_token(
        config: &BotConfig,
        options: BotOptions,
        token: Option<String>,
        span: Span,
    ) -> Result<Self, BotError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::error!(parent: &span, "No Discord token found in environment variables");
            return Err(BotError::MissingToken);
        };

        Ok(Self {
            token: BotToken(token),
            command_prefix: config.prefix.clone(),
            options,
            cogs: config.cogs.clone(),
            loaded_extensions: Vec::new(),
            lifecycle: Arc::new(Lifecycle::new(config.prefix.clone(), span)),
        })
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn options(&self) -> &BotOptions {
        &self.options
    }

    pub fn loaded_extensions(&self) -> &[CogId] {
        &self.loaded_extensions
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Load the configured cogs. Errors propagate: a partial cog set never runs.
    pub async fn setup_hook<L: ExtensionLoader + ?Sized>(
        &mut self,
        loader: &L,
    ) -> Result<(), BotError> {
        self.loaded_extensions = self.lifecycle.load_extensions(&self.cogs, loader).await?;
        Ok(())
    }

    /// Hand control to the network session. Every failure is logged and
    /// reported through `RunOutcome`; nothing propagates from here.
    pub async fn run<R: SessionRunner>(self, runner: R) -> RunOutcome {
        let lifecycle = self.lifecycle();
        let span = lifecycle.span().clone();

        match runner.run(&self.token).await {
            Ok(()) => {
                tracing::info!(parent: &span, "Session closed, shutting down");
                lifecycle.session_closed().await;
                RunOutcome::Stopped
            }
            Err(SessionError::InvalidToken) => {
                tracing::error!(
                    parent: &span,
                    "Invalid Discord token. Please check your environment variables."
                );
                lifecycle.failed().await;
                RunOutcome::InvalidToken
            }
            Err(SessionError::Other(message)) => {
                tracing::error!(parent: &span, "Error running bot: {}", message);
                lifecycle.failed().await;
                RunOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::{ExtensionError, Phase};
    use async_trait::async_trait;

    fn options() -> BotOptions {
        BotOptions {
            description: "test".to_string(),
        }
    }

    fn build(config: &BotConfig, token: Option<&str>) -> Result<DiscordBot, BotError> {
        DiscordBot::with_token(config, options(), token.map(str::to_string), Span::none())
    }

    struct NoopLoader;

    #[async_trait]
    impl ExtensionLoader for NoopLoader {
        async fn load_extension(&self, _cog: CogId) -> Result<(), ExtensionError> {
            Ok(())
        }
    }

    struct ScriptedRunner {
        result: Result<(), SessionError>,
        expected_token: &'static str,
    }

    #[async_trait]
    impl SessionRunner for ScriptedRunner {
        async fn run(self, token: &BotToken) -> Result<(), SessionError> {
            assert_eq!(token.expose(), self.expected_token);
            self.result
        }
    }

    #[test]
    fn test_missing_token_is_a_construction_error() {
        let result = build(&BotConfig::default(), None);
        assert!(matches!(result, Err(BotError::MissingToken)));

        let result = build(&BotConfig::default(), Some(""));
        assert!(matches!(result, Err(BotError::MissingToken)));
    }

    #[test]
    fn test_token_is_retained_exactly() {
        let bot = build(&BotConfig::default(), Some("abc.DEF.123 ")).unwrap();

        assert_eq!(bot.token.expose(), "abc.DEF.123 ");
        assert_eq!(bot.command_prefix(), "!");
        assert!(bot.loaded_extensions().is_empty());
    }

    #[test]
    fn test_reads_token_from_environment() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let bot = DiscordBot::new(&BotConfig::default(), options(), Span::none()).unwrap();
        assert_eq!(bot.token.expose(), "env-token");

        std::env::remove_var(TOKEN_ENV_VAR);
        let result = DiscordBot::new(&BotConfig::default(), options(), Span::none());
        assert!(matches!(result, Err(BotError::MissingToken)));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let bot = build(&BotConfig::default(), Some("secret")).unwrap();
        let printed = format!("{:?}", bot.token);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_lifecycle_logs_under_the_given_span() {
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());
        let span = tracing::info_span!("guild_bot");

        let bot =
            DiscordBot::with_token(&BotConfig::default(), options(), Some("t".into()), span)
                .unwrap();

        let name = bot.lifecycle().span().metadata().map(|m| m.name());
        assert_eq!(name, Some("guild_bot"));
    }

    #[tokio::test]
    async fn test_lifecycle_handle_sees_startup_progress() {
        let mut bot = build(&BotConfig::default(), Some("t")).unwrap();
        let handle = bot.lifecycle();
        assert_eq!(handle.phase().await, Phase::Constructed);

        bot.setup_hook(&NoopLoader).await.unwrap();

        assert!(Arc::ptr_eq(&handle, &bot.lifecycle()));
        assert_eq!(handle.phase().await, Phase::Starting);
    }

    #[tokio::test]
    async fn test_setup_hook_records_loaded_extensions() {
        let config = BotConfig {
            cogs: vec!["admin".to_string(), "general".to_string()],
            ..Default::default()
        };
        let mut bot = build(&config, Some("t")).unwrap();

        bot.setup_hook(&NoopLoader).await.unwrap();

        assert_eq!(bot.loaded_extensions(), &[CogId::Admin, CogId::General]);
    }

    #[tokio::test]
    async fn test_run_swallows_invalid_token() {
        let bot = build(&BotConfig::default(), Some("bad")).unwrap();
        let lifecycle = bot.lifecycle();

        let outcome = bot
            .run(ScriptedRunner {
                result: Err(SessionError::InvalidToken),
                expected_token: "bad",
            })
            .await;

        assert_eq!(outcome, RunOutcome::InvalidToken);
        assert_eq!(lifecycle.phase().await, Phase::TerminatedWithError);
    }

    #[tokio::test]
    async fn test_run_swallows_other_errors() {
        let bot = build(&BotConfig::default(), Some("t")).unwrap();

        let outcome = bot
            .run(ScriptedRunner {
                result: Err(SessionError::Other("gateway closed".to_string())),
                expected_token: "t",
            })
            .await;

        assert_eq!(outcome, RunOutcome::Failed("gateway closed".to_string()));
    }

    #[tokio::test]
    async fn test_clean_session_end_stops() {
        let mut bot = build(&BotConfig::default(), Some("t")).unwrap();
        bot.setup_hook(&NoopLoader).await.unwrap();
        let lifecycle = bot.lifecycle();

        let outcome = bot
            .run(ScriptedRunner {
                result: Ok(()),
                expected_token: "t",
            })
            .await;

        assert_eq!(outcome, RunOutcome::Stopped);
        assert_eq!(lifecycle.phase().await, Phase::Stopped);
    }
}
