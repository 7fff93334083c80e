// Cog registry.
//
// Each cog is a plain function returning its poise commands. The registry
// maps a `CogId` to that function and collects the commands of every cog the
// startup hook loads, in load order.

pub mod admin;
pub mod fun;
pub mod general;
pub mod moderation;

use crate::core::cogs::CogId;
use crate::core::lifecycle::{ExtensionError, ExtensionLoader};
use crate::discord::{Data, Error};
use async_trait::async_trait;
use tokio::sync::Mutex;

pub type Command = poise::Command<Data, Error>;
type CommandFactory = fn() -> Vec<Command>;

fn factory(cog: CogId) -> CommandFactory {
    match cog {
        CogId::General => general::commands,
        CogId::Moderation => moderation::commands,
        CogId::Fun => fun::commands,
        CogId::Admin => admin::commands,
    }
}

#[derive(Default)]
struct RegistryState {
    loaded: Vec<CogId>,
    commands: Vec<Command>,
}

#[derive(Default)]
pub struct CogRegistry {
    state: Mutex<RegistryState>,
}

impl CogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the collected commands to the framework.
    pub fn into_commands(self) -> Vec<Command> {
        self.state.into_inner().commands
    }
}

#[async_trait]
impl ExtensionLoader for CogRegistry {
    async fn load_extension(&self, cog: CogId) -> Result<(), ExtensionError> {
        let mut state = self.state.lock().await;
        if state.loaded.contains(&cog) {
            return Err(ExtensionError::AlreadyLoaded(cog));
        }

        let mut commands = factory(cog)();
        for command in &mut commands {
            if state.commands.iter().any(|c| c.name == command.name) {
                return Err(ExtensionError::DuplicateCommand {
                    cog,
                    command: command.name.clone(),
                });
            }
            command.category = Some(cog.display_name().to_string());
        }

        tracing::debug!(%cog, commands = commands.len(), "Registering cog commands");
        state.commands.extend(commands);
        state.loaded.push(cog);
        Ok(())
    }
}
