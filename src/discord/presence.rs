// Bot presence and the ready event.
//
// Everything here is Discord-layer glue: the core decides what the presence
// says, this module turns it into serenity's ActivityData.

use crate::core::lifecycle::{ActivityKind, Lifecycle, Presence, ReadyInfo};
use poise::serenity_prelude as serenity;

pub fn apply(ctx: &serenity::Context, presence: &Presence) {
    let activity = match presence.kind {
        ActivityKind::Listening => serenity::ActivityData::listening(presence.text.clone()),
        ActivityKind::Playing => serenity::ActivityData::playing(presence.text.clone()),
    };
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Handles every Ready event, including the ones after a reconnect.
pub async fn on_ready(ctx: &serenity::Context, ready: &serenity::Ready, lifecycle: &Lifecycle) {
    let info = ReadyInfo {
        user_name: ready.user.name.clone(),
        user_id: ready.user.id.get(),
        guild_count: ready.guilds.len(),
    };

    let presence = lifecycle.on_ready(&info).await;
    apply(ctx, &presence);
    lifecycle.presence_applied().await;
}
