//! Channel session registry.
//!
//! Process-wide bookkeeping for the join/leave controller: pending joins, debounce
//! stamps and active voice sessions. The registry is constructed by whoever builds the
//! controller and injected into it, so tests start from an empty one.
//!
//! All state sits behind one `RwLock`. Callers take the write guard, perform a full
//! check-and-set on `RegistryState`, and drop the guard before awaiting anything else.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, GuildId};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::Instant;

use crate::model::session::{ActiveSession, PendingTrigger};
use crate::scheduler::occupancy_poll::PollHandle;

/// Result of moving a pending trigger to a connected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// Session recorded, the bot stays.
    Connected,
    /// Session recorded, but the channel emptied while joining and the bot must leave.
    LeaveRequested,
    /// The trigger was already released or replaced; nothing was recorded.
    Stale,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for a check-and-set.
    ///
    /// Never hold the guard across an `.await` on anything other than the lock itself.
    pub async fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().await
    }

    #[cfg(test)]
    pub async fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().await
    }
}

/// Contents of the registry.
#[derive(Default)]
pub struct RegistryState {
    next_generation: u64,
    pending: HashMap<ChannelId, PendingTrigger>,
    /// Channel -> instant until which new triggers are ignored.
    debounce: HashMap<ChannelId, Instant>,
    sessions: HashMap<GuildId, ActiveSession>,
}

impl RegistryState {
    pub fn session_for_guild(&self, guild_id: GuildId) -> Option<&ActiveSession> {
        self.sessions.get(&guild_id)
    }

    pub fn is_connected_to(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.sessions
            .get(&guild_id)
            .is_some_and(|session| session.channel_id == channel_id)
    }

    /// Pending trigger for a channel, dropping it first if it has expired.
    pub fn pending_mut(
        &mut self,
        channel_id: ChannelId,
        now: Instant,
    ) -> Option<&mut PendingTrigger> {
        if self
            .pending
            .get(&channel_id)
            .is_some_and(|trigger| trigger.is_expired(now))
        {
            if let Some(expired) = self.pending.remove(&channel_id) {
                tracing::debug!(
                    "Pending join for channel {} expired (generation {})",
                    channel_id,
                    expired.generation
                );
            }
        }

        self.pending.get_mut(&channel_id)
    }

    pub fn is_pending(&mut self, channel_id: ChannelId, now: Instant) -> bool {
        self.pending_mut(channel_id, now).is_some()
    }

    /// Any unexpired pending trigger in the guild, whichever channel it targets.
    pub fn pending_for_guild(
        &mut self,
        guild_id: GuildId,
        now: Instant,
    ) -> Option<&PendingTrigger> {
        self.prune_expired(now);
        self.pending
            .values()
            .find(|trigger| trigger.guild_id == guild_id)
    }

    /// Whether nothing in the guild owns the voice connection: no session, no join in
    /// flight.
    pub fn guild_is_idle(&mut self, guild_id: GuildId, now: Instant) -> bool {
        self.session_for_guild(guild_id).is_none()
            && self.pending_for_guild(guild_id, now).is_none()
    }

    /// Whether the channel triggered recently enough that a new trigger is ignored.
    pub fn is_debounced(&mut self, channel_id: ChannelId, now: Instant) -> bool {
        match self.debounce.get(&channel_id) {
            Some(until) if now < *until => true,
            Some(_) => {
                self.debounce.remove(&channel_id);
                false
            }
            None => false,
        }
    }

    /// Records a new pending trigger and its debounce stamp.
    ///
    /// # Arguments
    /// - `guild_id` / `channel_id` - Where the join is going
    /// - `now` - Instant the qualifying occupancy was observed
    /// - `window` - Debounce window, also the deadline for the join to complete
    ///
    /// # Returns
    /// - `PendingTrigger` - Copy of the recorded trigger, carrying its generation
    pub fn begin_pending(
        &mut self,
        guild_id: GuildId,
        channel_id: ChannelId,
        now: Instant,
        window: Duration,
    ) -> PendingTrigger {
        self.prune_expired(now);
        self.next_generation += 1;

        let trigger = PendingTrigger {
            generation: self.next_generation,
            guild_id,
            channel_id,
            first_observed_at: now,
            expires_at: now + window,
            leave_requested: false,
        };

        self.pending.insert(channel_id, trigger.clone());
        self.debounce.insert(channel_id, trigger.expires_at);

        trigger
    }

    /// Drops the pending trigger if it is still the given generation.
    ///
    /// The debounce stamp is kept until it expires.
    pub fn release_pending(
        &mut self,
        channel_id: ChannelId,
        generation: u64,
    ) -> Option<PendingTrigger> {
        match self.pending.get(&channel_id) {
            Some(trigger) if trigger.generation == generation => {
                self.pending.remove(&channel_id)
            }
            _ => None,
        }
    }

    /// Replaces a pending trigger with an active session.
    ///
    /// An existing session of the guild is never overwritten; the trigger is dropped
    /// and reported `Stale` instead. On `Stale` the poll handle is dropped here, which
    /// cancels it.
    pub fn promote(
        &mut self,
        trigger: &PendingTrigger,
        poll: PollHandle,
        now: Instant,
    ) -> Promotion {
        let Some(current) = self.release_pending(trigger.channel_id, trigger.generation) else {
            return Promotion::Stale;
        };

        if let Some(existing) = self.sessions.get(&current.guild_id) {
            tracing::warn!(
                "Guild {} already has a session in channel {}, dropping join for {}",
                current.guild_id,
                existing.channel_id,
                current.channel_id
            );
            return Promotion::Stale;
        }

        self.sessions.insert(
            current.guild_id,
            ActiveSession {
                guild_id: current.guild_id,
                channel_id: current.channel_id,
                started_at: now,
                last_audio_finished: false,
                poll,
            },
        );

        if current.leave_requested {
            Promotion::LeaveRequested
        } else {
            Promotion::Connected
        }
    }

    /// Removes the guild's session if it is in `channel_id`.
    ///
    /// Also clears any pending trigger for the channel. The returned session still owns
    /// its poll handle; the caller cancels it and releases the connection.
    pub fn end_session(
        &mut self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Option<ActiveSession> {
        if !self.is_connected_to(guild_id, channel_id) {
            return None;
        }

        self.end_guild_session(guild_id)
    }

    /// Removes the guild's session wherever it is.
    pub fn end_guild_session(&mut self, guild_id: GuildId) -> Option<ActiveSession> {
        let session = self.sessions.remove(&guild_id)?;
        self.pending.remove(&session.channel_id);
        Some(session)
    }

    pub fn mark_audio_finished(&mut self, guild_id: GuildId, channel_id: ChannelId) {
        if let Some(session) = self.sessions.get_mut(&guild_id) {
            if session.channel_id == channel_id {
                session.last_audio_finished = true;
            }
        }
    }

    /// Drops expired pending triggers and debounce stamps.
    fn prune_expired(&mut self, now: Instant) {
        self.pending.retain(|channel_id, trigger| {
            let expired = trigger.is_expired(now);
            if expired {
                tracing::debug!(
                    "Pending join for channel {} expired (generation {})",
                    channel_id,
                    trigger.generation
                );
            }
            !expired
        });
        self.debounce.retain(|_, until| now < *until);
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn debounce_count(&self) -> usize {
        self.debounce.len()
    }
}
