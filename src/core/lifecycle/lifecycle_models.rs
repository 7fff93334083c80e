// Lifecycle domain types: phases, the events that move between them, the
// errors the controller reports, and the presence it asks Discord to show.
//
// No Discord dependencies here. The Discord layer converts serenity events
// into these types and back.

use crate::core::cogs::{CogId, UnknownCog};
use thiserror::Error;

// ============================================================================
// PHASES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    /// Startup hook running or finished, gateway not ready yet.
    Starting,
    /// Ready event received, presence not yet applied.
    Ready,
    /// Steady state: commands are being dispatched.
    Running,
    /// The session was closed on request.
    Stopped,
    TerminatedWithError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    StartupHook,
    ReadyReceived,
    PresenceApplied,
    SessionClosed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Stopped | Phase::TerminatedWithError)
    }

    /// Apply `event`, returning the next phase or `None` if it is not allowed.
    ///
    /// Ready may arrive again after every reconnect, so it is accepted from
    /// any live phase past startup.
    pub fn next(self, event: LifecycleEvent) -> Option<Phase> {
        use LifecycleEvent::*;

        match (self, event) {
            (Phase::Constructed, StartupHook) => Some(Phase::Starting),
            (Phase::Starting | Phase::Ready | Phase::Running, ReadyReceived) => Some(Phase::Ready),
            (Phase::Ready, PresenceApplied) => Some(Phase::Running),
            (Phase::Starting | Phase::Ready | Phase::Running, SessionClosed) => {
                Some(Phase::Stopped)
            }
            (phase, Failed) if !phase.is_terminal() => Some(Phase::TerminatedWithError),
            _ => None,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error(transparent)]
    UnknownCog(#[from] UnknownCog),

    #[error("Cog {0} is already loaded")]
    AlreadyLoaded(CogId),

    #[error("Command `{command}` from cog {cog} is already registered")]
    DuplicateCommand { cog: CogId, command: String },
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("DISCORD_TOKEN not set in environment variables")]
    MissingToken,

    #[error("Failed to load cog `{name}`: {source}")]
    ExtensionLoad {
        name: String,
        #[source]
        source: ExtensionError,
    },

    #[error("Invalid lifecycle transition: {event:?} while {from:?}")]
    InvalidTransition { from: Phase, event: LifecycleEvent },
}

/// Failure reported by the network session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("{0}")]
    Other(String),
}

/// How `DiscordBot::run` ended. The run call never propagates errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Stopped,
    InvalidToken,
    Failed(String),
}

// ============================================================================
// READY / PRESENCE
// ============================================================================

/// What the ready event tells us about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyInfo {
    pub user_name: String,
    pub user_id: u64,
    pub guild_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Listening,
    Playing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub kind: ActivityKind,
    pub text: String,
}

impl Presence {
    pub fn listening(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Listening,
            text: text.into(),
        }
    }

    pub fn playing(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Playing,
            text: text.into(),
        }
    }

    /// The default presence: "listening to `<prefix>help`".
    pub fn help_hint(prefix: &str) -> Self {
        Self::listening(format!("{prefix}help"))
    }
}
