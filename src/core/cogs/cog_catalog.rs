// Compile-time catalog of the cogs this bot knows how to load.
//
// Configuration refers to cogs by name; names are resolved to a `CogId` here
// so the rest of the bot never has to look anything up by string.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CogId {
    General,
    Moderation,
    Fun,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown cog: {0}")]
pub struct UnknownCog(pub String);

impl CogId {
    pub const ALL: [CogId; 4] = [CogId::General, CogId::Moderation, CogId::Fun, CogId::Admin];

    /// Canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            CogId::General => "general",
            CogId::Moderation => "moderation",
            CogId::Fun => "fun",
            CogId::Admin => "admin",
        }
    }

    /// Category label shown in the help output.
    pub fn display_name(self) -> &'static str {
        match self {
            CogId::General => "General",
            CogId::Moderation => "Moderation",
            CogId::Fun => "Fun",
            CogId::Admin => "Administration",
        }
    }
}

impl FromStr for CogId {
    type Err = UnknownCog;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if name == "mod" {
            return Ok(CogId::Moderation);
        }

        CogId::ALL
            .into_iter()
            .find(|cog| cog.as_str() == name)
            .ok_or_else(|| UnknownCog(s.to_string()))
    }
}

impl std::fmt::Display for CogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
