use serenity::all::{ChannelId, GuildId};
use tokio::time::Instant;

use crate::scheduler::occupancy_poll::PollHandle;

/// Join request in flight for a channel.
///
/// At most one exists per channel. The generation id lets a finishing join tell
/// whether the trigger it started is still the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTrigger {
    pub generation: u64,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub first_observed_at: Instant,
    pub expires_at: Instant,
    /// Everyone left while the join was still in flight.
    pub leave_requested: bool,
}

impl PendingTrigger {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// The bot's presence in a voice channel.
///
/// The songbird `Call` is addressed by guild id, so the session only records where it
/// is connected. Dropping the session cancels its occupancy poll.
#[derive(Debug)]
pub struct ActiveSession {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub started_at: Instant,
    pub last_audio_finished: bool,
    pub poll: PollHandle,
}
