// Authorization rules for privileged commands.
//
// The Discord layer flattens a command context into an `InvocationSnapshot`
// and asks this module whether the invoker may run a gated command. Nothing
// here talks to Discord, so the rules can be tested with plain values.

/// Role name (compared lower-cased) that grants moderator access.
pub const MODERATOR_ROLE: &str = "moderator";

/// The guild a command was invoked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildSnapshot {
    pub owner_id: u64,
}

/// Everything the predicate needs to know about a single command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationSnapshot {
    pub user_id: u64,
    /// `None` when the command was invoked outside a guild (e.g. in DMs).
    pub guild: Option<GuildSnapshot>,
    pub is_administrator: bool,
    pub role_names: Vec<String>,
}

/// Why an invocation was (or wasn't) authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Owner,
    Administrator,
    Moderator,
    Denied,
    /// Invoked outside of a guild. Always denied.
    NoGuild,
}

impl Authorization {
    pub fn is_granted(self) -> bool {
        matches!(
            self,
            Authorization::Owner | Authorization::Administrator | Authorization::Moderator
        )
    }
}

impl std::fmt::Display for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Owner => write!(f, "guild owner"),
            Authorization::Administrator => write!(f, "administrator"),
            Authorization::Moderator => write!(f, "moderator role"),
            Authorization::Denied => write!(f, "denied"),
            Authorization::NoGuild => write!(f, "not in a guild"),
        }
    }
}

/// Evaluate owner, then administrator, then moderator role.
pub fn authorize(snapshot: &InvocationSnapshot) -> Authorization {
    let Some(guild) = snapshot.guild else {
        return Authorization::NoGuild;
    };

    if snapshot.user_id == guild.owner_id {
        return Authorization::Owner;
    }

    if snapshot.is_administrator {
        return Authorization::Administrator;
    }

    if snapshot
        .role_names
        .iter()
        .any(|name| name.to_lowercase() == MODERATOR_ROLE)
    {
        return Authorization::Moderator;
    }

    Authorization::Denied
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u64 = 1;
    const MEMBER: u64 = 42;

    fn granted(snapshot: &InvocationSnapshot) -> bool {
        authorize(snapshot).is_granted()
    }

    fn snapshot(user_id: u64, is_administrator: bool, roles: &[&str]) -> InvocationSnapshot {
        InvocationSnapshot {
            user_id,
            guild: Some(GuildSnapshot { owner_id: OWNER }),
            is_administrator,
            role_names: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_owner_is_always_authorized() {
        assert_eq!(authorize(&snapshot(OWNER, false, &[])), Authorization::Owner);
        assert_eq!(
            authorize(&snapshot(OWNER, true, &["Moderator"])),
            Authorization::Owner
        );
        assert!(granted(&snapshot(OWNER, false, &["Member"])));
    }

    #[test]
    fn test_administrator_is_authorized() {
        assert_eq!(
            authorize(&snapshot(MEMBER, true, &[])),
            Authorization::Administrator
        );
        assert!(granted(&snapshot(MEMBER, true, &["Member"])));
    }

    #[test]
    fn test_moderator_role_is_case_insensitive() {
        for role in ["moderator", "Moderator", "MODERATOR", "mOdErAtOr"] {
            let result = authorize(&snapshot(MEMBER, false, &["Member", role]));
            assert_eq!(result, Authorization::Moderator, "role {role} should match");
        }
    }

    #[test]
    fn test_similar_role_names_do_not_match() {
        let result = authorize(&snapshot(
            MEMBER,
            false,
            &["Moderators", "Head Moderator", " moderator", "mod"],
        ));
        assert_eq!(result, Authorization::Denied);
    }

    #[test]
    fn test_plain_member_is_denied() {
        assert!(!granted(&snapshot(MEMBER, false, &[])));
        assert!(!granted(&snapshot(
            MEMBER,
            false,
            &["Member", "Gamer"]
        )));
    }

    #[test]
    fn test_outside_guild_is_denied() {
        let dm = InvocationSnapshot {
            user_id: MEMBER,
            guild: None,
            is_administrator: true,
            role_names: vec!["Moderator".to_string()],
        };

        assert_eq!(authorize(&dm), Authorization::NoGuild);
        assert!(!granted(&dm));
    }

    #[tokio::test]
    async fn test_result_is_the_same_when_evaluated_async() {
        let snap = snapshot(MEMBER, false, &["moderator"]);
        let sync_result = granted(&snap);
        let async_result = async { granted(&snap) }.await;
        assert_eq!(sync_result, async_result);
    }
}
