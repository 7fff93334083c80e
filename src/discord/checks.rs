// Command guards.
//
// Flattens a poise context into the primitives `core::auth` works with, so
// the actual rules stay testable without a live Discord connection.

use crate::core::auth::{authorize, GuildSnapshot, InvocationSnapshot};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Owner, administrator, or a member with a role named "Moderator".
///
/// Attach with `check = "is_admin_owner_mod"`. Invocations outside a guild
/// are denied.
pub async fn is_admin_owner_mod(ctx: Context<'_>) -> Result<bool, Error> {
    let snapshot = invocation_snapshot(ctx).await;
    let decision = authorize(&snapshot);

    tracing::debug!(
        user_id = snapshot.user_id,
        command = %ctx.command().qualified_name,
        %decision,
        "Authorization check"
    );

    Ok(decision.is_granted())
}

async fn invocation_snapshot(ctx: Context<'_>) -> InvocationSnapshot {
    let user_id = ctx.author().id.get();

    let Some(guild_id) = ctx.guild_id() else {
        return unresolved_snapshot(user_id, Unresolved::NotInGuild);
    };
    let Some(member) = ctx.author_member().await.map(|m| m.into_owned()) else {
        return unresolved_snapshot(user_id, Unresolved::MemberLookupFailed(guild_id));
    };

    // The cache guard is not Send, so it must not live across an await.
    let snapshot = ctx.guild().map(|guild| snapshot_from_guild(&guild, &member));
    snapshot.unwrap_or_else(|| unresolved_snapshot(user_id, Unresolved::GuildNotCached(guild_id)))
}

/// Why an invocation could not be tied to a cached guild member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unresolved {
    NotInGuild,
    MemberLookupFailed(serenity::GuildId),
    GuildNotCached(serenity::GuildId),
}

/// A snapshot without a guild, which `authorize` always denies. Cache and
/// lookup failures inside a guild are warned about; DMs are not.
fn unresolved_snapshot(user_id: u64, reason: Unresolved) -> InvocationSnapshot {
    match reason {
        Unresolved::NotInGuild => {
            tracing::debug!(user_id, "Guarded command invoked outside a guild");
        }
        Unresolved::MemberLookupFailed(guild_id) => {
            tracing::warn!(
                user_id,
                guild_id = guild_id.get(),
                "Member lookup failed, denying guarded command"
            );
        }
        Unresolved::GuildNotCached(guild_id) => {
            tracing::warn!(
                user_id,
                guild_id = guild_id.get(),
                "Guild not in cache, denying guarded command"
            );
        }
    }

    InvocationSnapshot {
        user_id,
        ..Default::default()
    }
}

fn snapshot_from_guild(guild: &serenity::Guild, member: &serenity::Member) -> InvocationSnapshot {
    let role_names = member
        .roles
        .iter()
        .filter_map(|role_id| guild.roles.get(role_id))
        .map(|role| role.name.clone())
        .collect();

    InvocationSnapshot {
        user_id: member.user.id.get(),
        guild: Some(GuildSnapshot {
            owner_id: guild.owner_id.get(),
        }),
        is_administrator: guild.member_permissions(member).administrator(),
        role_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::Authorization;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const GUILD: u64 = 100;
    const OWNER: u64 = 1;
    const MEMBER: u64 = 42;

    fn role(id: u64, name: &str, permissions: serenity::Permissions) -> serenity::Role {
        let mut role = serenity::Role::default();
        role.id = serenity::RoleId::new(id);
        role.guild_id = serenity::GuildId::new(GUILD);
        role.name = name.to_string();
        role.permissions = permissions;
        role
    }

    /// A guild owned by `OWNER` with an @everyone role plus `roles`.
    fn guild_with(roles: Vec<serenity::Role>) -> serenity::Guild {
        let mut guild = serenity::Guild::default();
        guild.id = serenity::GuildId::new(GUILD);
        guild.owner_id = serenity::UserId::new(OWNER);

        let everyone = role(GUILD, "@everyone", serenity::Permissions::SEND_MESSAGES);
        for role in std::iter::once(everyone).chain(roles) {
            guild.roles.insert(role.id, role);
        }
        guild
    }

    fn member(user_id: u64, role_ids: &[u64]) -> serenity::Member {
        let mut member = serenity::Member::default();
        member.guild_id = serenity::GuildId::new(GUILD);
        member.user.id = serenity::UserId::new(user_id);
        member.roles = role_ids.iter().map(|id| serenity::RoleId::new(*id)).collect();
        member
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_upper_case_moderator_role_is_granted() {
        let guild = guild_with(vec![role(10, "MODERATOR", serenity::Permissions::empty())]);

        let snapshot = snapshot_from_guild(&guild, &member(MEMBER, &[10]));

        assert_eq!(snapshot.role_names, vec!["MODERATOR".to_string()]);
        assert!(!snapshot.is_administrator);
        assert_eq!(authorize(&snapshot), Authorization::Moderator);
    }

    #[test]
    fn test_guild_owner_maps_to_owner() {
        let guild = guild_with(Vec::new());

        let snapshot = snapshot_from_guild(&guild, &member(OWNER, &[]));

        assert_eq!(snapshot.guild, Some(GuildSnapshot { owner_id: OWNER }));
        assert_eq!(authorize(&snapshot), Authorization::Owner);
    }

    #[test]
    fn test_administrator_role_sets_permission_flag() {
        let guild = guild_with(vec![role(11, "Staff", serenity::Permissions::ADMINISTRATOR)]);

        let snapshot = snapshot_from_guild(&guild, &member(MEMBER, &[11]));

        assert!(snapshot.is_administrator);
        assert_eq!(authorize(&snapshot), Authorization::Administrator);
    }

    #[test]
    fn test_plain_member_is_denied_and_unknown_roles_skipped() {
        let guild = guild_with(vec![role(12, "Member", serenity::Permissions::SEND_MESSAGES)]);

        // 99 is not a role of this guild.
        let snapshot = snapshot_from_guild(&guild, &member(MEMBER, &[12, 99]));

        assert_eq!(snapshot.user_id, MEMBER);
        assert_eq!(snapshot.role_names, vec!["Member".to_string()]);
        assert!(!snapshot.is_administrator);
        assert_eq!(authorize(&snapshot), Authorization::Denied);
    }

    #[test]
    fn test_unresolved_invocations_are_denied() {
        let guild_id = serenity::GuildId::new(GUILD);

        for reason in [
            Unresolved::NotInGuild,
            Unresolved::MemberLookupFailed(guild_id),
            Unresolved::GuildNotCached(guild_id),
        ] {
            let snapshot = unresolved_snapshot(MEMBER, reason);
            assert_eq!(snapshot.user_id, MEMBER);
            assert!(!authorize(&snapshot).is_granted(), "{reason:?} should deny");
        }
    }

    #[test]
    fn test_cache_misses_are_logged_apart_from_dms() {
        let guild_id = serenity::GuildId::new(GUILD);

        let dm = captured(|| {
            unresolved_snapshot(MEMBER, Unresolved::NotInGuild);
        });
        assert!(dm.contains("outside a guild"));
        assert!(!dm.contains("WARN"));

        let member_miss = captured(|| {
            unresolved_snapshot(MEMBER, Unresolved::MemberLookupFailed(guild_id));
        });
        assert!(member_miss.contains("WARN"));
        assert!(member_miss.contains("Member lookup failed"));
        assert!(member_miss.contains("guild_id=100"));

        let guild_miss = captured(|| {
            unresolved_snapshot(MEMBER, Unresolved::GuildNotCached(guild_id));
        });
        assert!(guild_miss.contains("WARN"));
        assert!(guild_miss.contains("Guild not in cache"));
    }
}
