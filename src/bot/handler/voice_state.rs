use std::sync::Arc;

use serenity::all::{Context, VoiceState};

use crate::service::controller::JoinLeaveController;
use crate::service::watcher::MembershipWatcher;

/// Handle a voice state change.
///
/// Serenity has already applied the change to its cache, so the affected channel is
/// counted from the cached guild. The cache guard is released before the controller
/// runs, which may await a full join and playback.
pub async fn handle_voice_state_update(
    controller: &Arc<JoinLeaveController>,
    ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    let Some(guild_id) = new.guild_id else {
        return;
    };

    let occupancy = {
        let watcher = MembershipWatcher::new(ctx.cache.current_user().id);
        let Some(guild) = ctx.cache.guild(guild_id) else {
            tracing::debug!("Voice state update for uncached guild {}", guild_id);
            return;
        };

        watcher.observe(&guild, old.as_ref(), &new)
    };

    let Some(occupancy) = occupancy else {
        return;
    };

    tracing::debug!(
        "Channel {} of guild {}: {} connected, {} non-bot, bot present: {}",
        occupancy.channel_id,
        occupancy.guild_id,
        occupancy.total_member_count,
        occupancy.non_bot_member_count,
        occupancy.bot_present
    );

    let outcome = controller.handle_occupancy(occupancy).await;
    tracing::debug!(
        "Voice state update in channel {} handled: {:?}",
        occupancy.channel_id,
        outcome
    );
}
