//! Join/leave controller.
//!
//! Applies the per-channel state machine (idle, pending, connected) to occupancy facts
//! from the membership watcher, to ticks of the occupancy poll and to connection
//! reports from the voice library.
//!
//! Every state change is decided inside one write section of the `SessionRegistry`,
//! and every path out of a session (emptied channel, queued leave, connection error,
//! destroyed connection) ends in `close`, which cancels the poll and releases the
//! connection.

use std::fmt;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};
use tokio::time::{timeout, Instant};

use crate::config::ControllerSettings;
use crate::error::{voice::VoiceError, AppError};
use crate::model::connection::{ConnectionEvent, ConnectionEventKind};
use crate::model::occupancy::ChannelOccupancy;
use crate::model::session::{ActiveSession, PendingTrigger};
use crate::scheduler::occupancy_poll::{start_occupancy_poll, PollHandle};
use crate::service::gateway::{OccupancyProbe, VoiceGateway};
use crate::service::registry::{Promotion, RegistryState, SessionRegistry};

/// What an occupancy event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The bot joined and the notification was played (or skipped on error).
    Joined,
    /// A join was attempted and failed; the channel is idle again.
    JoinFailed,
    /// The bot left the channel.
    Left,
    /// A qualifying event was dropped.
    Suppressed(SuppressReason),
    /// The channel emptied while a join is in flight; the bot leaves once it lands.
    LeaveQueued,
    /// Nothing to do.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// A join for this channel is already in flight.
    Pending,
    /// The bot is already in this channel.
    Connected,
    /// The bot is connected, or joining, in another channel of the same guild.
    GuildBusy,
    /// The channel triggered within the debounce window.
    Debounced,
}

/// Result of an explicit summon through the text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summon {
    Joined,
    AlreadyConnected,
    /// A threshold join for the same channel is in flight and will announce itself.
    JoinInProgress,
    /// Everyone left before the join landed, so the bot left again.
    ChannelEmptied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LeaveReason {
    Empty,
    EmptiedWhileJoining,
    ConnectionError(String),
    ConnectionDestroyed,
}

impl LeaveReason {
    /// Whether the voice library still holds a handle that must be released.
    fn releases_handle(&self) -> bool {
        !matches!(self, LeaveReason::ConnectionDestroyed)
    }
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveReason::Empty => write!(f, "channel empty"),
            LeaveReason::EmptiedWhileJoining => write!(f, "channel emptied while joining"),
            LeaveReason::ConnectionError(reason) => write!(f, "connection error: {}", reason),
            LeaveReason::ConnectionDestroyed => write!(f, "connection destroyed"),
        }
    }
}

enum Step {
    Begin(PendingTrigger),
    Leave(ActiveSession),
    Suppress(SuppressReason),
    QueueLeave,
    Nothing,
}

enum Connected {
    Staying,
    LeftImmediately,
}

pub struct JoinLeaveController {
    settings: ControllerSettings,
    registry: SessionRegistry,
    gateway: Arc<dyn VoiceGateway>,
    probe: Arc<dyn OccupancyProbe>,
}

impl JoinLeaveController {
    /// Creates a controller over an injected registry and collaborators.
    ///
    /// # Arguments
    /// - `settings` - Threshold, debounce window, poll interval, clip and volume
    /// - `registry` - Session bookkeeping, usually fresh
    /// - `gateway` - Voice operations
    /// - `probe` - Live occupancy lookup for the poll
    pub fn new(
        settings: ControllerSettings,
        registry: SessionRegistry,
        gateway: Arc<dyn VoiceGateway>,
        probe: Arc<dyn OccupancyProbe>,
    ) -> Arc<Self> {
        Arc::new(Self {
            settings,
            registry,
            gateway,
            probe,
        })
    }

    /// Applies one occupancy fact from the membership watcher.
    ///
    /// When the fact triggers a join, this resolves only after the join attempt and
    /// the notification clip have finished.
    pub async fn handle_occupancy(self: &Arc<Self>, occupancy: ChannelOccupancy) -> Outcome {
        let step = {
            let mut state = self.registry.write().await;
            decide(&mut state, &occupancy, &self.settings, Instant::now())
        };

        match step {
            Step::Begin(trigger) => {
                tracing::info!(
                    "{} members in channel {} of guild {}, joining",
                    occupancy.non_bot_member_count,
                    occupancy.channel_id,
                    occupancy.guild_id
                );
                self.join_and_announce(trigger).await
            }
            Step::Leave(session) => {
                self.close(session, LeaveReason::Empty).await;
                Outcome::Left
            }
            Step::Suppress(reason) => {
                tracing::debug!(
                    "Ignoring qualifying event for channel {} ({:?})",
                    occupancy.channel_id,
                    reason
                );
                Outcome::Suppressed(reason)
            }
            Step::QueueLeave => {
                tracing::debug!(
                    "Channel {} emptied while joining, leaving once connected",
                    occupancy.channel_id
                );
                Outcome::LeaveQueued
            }
            Step::Nothing => Outcome::Unchanged,
        }
    }

    /// Rechecks a connected channel, leaving if the bot is alone.
    ///
    /// Driven by the occupancy poll. Channels the cache cannot resolve are skipped
    /// until the next tick.
    pub async fn recheck(&self, guild_id: GuildId, channel_id: ChannelId) -> Outcome {
        let Some(occupancy) = self.probe.occupancy(guild_id, channel_id) else {
            tracing::debug!(
                "Channel {} of guild {} not in cache, skipping recheck",
                channel_id,
                guild_id
            );
            return Outcome::Unchanged;
        };

        if occupancy.total_member_count > 1 {
            return Outcome::Unchanged;
        }

        if self
            .leave_channel(guild_id, channel_id, LeaveReason::Empty)
            .await
        {
            Outcome::Left
        } else {
            Outcome::Unchanged
        }
    }

    /// Handles an unsolicited status report from the voice library.
    ///
    /// Errors and destroyed connections both end the guild's session; neither is
    /// retried.
    pub async fn handle_connection_event(&self, event: ConnectionEvent) {
        let session = self.registry.write().await.end_guild_session(event.guild_id);

        let Some(session) = session else {
            tracing::debug!(
                "Ignoring {:?} for guild {} without a voice session",
                event.kind,
                event.guild_id
            );
            return;
        };

        let reason = match event.kind {
            ConnectionEventKind::Error(reason) => {
                tracing::error!(
                    "Voice connection error in guild {}: {}",
                    event.guild_id,
                    reason
                );
                LeaveReason::ConnectionError(reason)
            }
            ConnectionEventKind::Destroyed => LeaveReason::ConnectionDestroyed,
        };

        self.close(session, reason).await;
    }

    /// Joins a channel on explicit request, bypassing threshold and debounce.
    ///
    /// The resulting session is tracked like any other and leaves when the channel
    /// empties. The caller plays the clip with `announce`.
    ///
    /// # Returns
    /// - `Ok(Summon)` - Connected, already there, or a threshold join is in flight
    /// - `Err(AppError::VoiceErr(GuildBusy))` - Connected or joining elsewhere in the guild
    /// - `Err(AppError::VoiceErr(_))` - The join failed
    pub async fn summon(
        self: &Arc<Self>,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Summon, AppError> {
        let trigger = {
            let now = Instant::now();
            let mut state = self.registry.write().await;

            if state.is_connected_to(guild_id, channel_id) {
                return Ok(Summon::AlreadyConnected);
            }
            if let Some(session) = state.session_for_guild(guild_id) {
                return Err(VoiceError::GuildBusy {
                    guild_id,
                    connected_to: session.channel_id,
                }
                .into());
            }
            if state.is_pending(channel_id, now) {
                return Ok(Summon::JoinInProgress);
            }
            if let Some(other) = state.pending_for_guild(guild_id, now) {
                return Err(VoiceError::GuildBusy {
                    guild_id,
                    connected_to: other.channel_id,
                }
                .into());
            }

            state.begin_pending(guild_id, channel_id, now, self.settings.debounce_window)
        };

        match self.connect(trigger).await? {
            Connected::Staying => Ok(Summon::Joined),
            Connected::LeftImmediately => Ok(Summon::ChannelEmptied),
        }
    }

    /// Plays the notification clip in a connected channel.
    ///
    /// Playback failures are logged and otherwise ignored; the bot stays connected
    /// either way.
    pub async fn announce(&self, guild_id: GuildId, channel_id: ChannelId) {
        let clip = &self.settings.notification_sound_path;

        match self
            .gateway
            .play(guild_id, clip, self.settings.playback_volume)
            .await
        {
            Ok(()) => tracing::info!(
                "Notification finished in channel {}, staying connected",
                channel_id
            ),
            Err(e) => tracing::warn!(
                "Skipping notification in channel {}: {}",
                channel_id,
                e
            ),
        }

        self.registry
            .write()
            .await
            .mark_audio_finished(guild_id, channel_id);
    }

    async fn join_and_announce(self: &Arc<Self>, trigger: PendingTrigger) -> Outcome {
        let guild_id = trigger.guild_id;
        let channel_id = trigger.channel_id;

        match self.connect(trigger).await {
            Ok(Connected::Staying) => {
                self.announce(guild_id, channel_id).await;
                Outcome::Joined
            }
            Ok(Connected::LeftImmediately) => Outcome::Left,
            Err(e) => {
                tracing::warn!("{}", e);
                Outcome::JoinFailed
            }
        }
    }

    /// Moves a pending trigger to connected, or back to idle on failure.
    async fn connect(self: &Arc<Self>, trigger: PendingTrigger) -> Result<Connected, VoiceError> {
        let guild_id = trigger.guild_id;
        let channel_id = trigger.channel_id;
        let budget = trigger.expires_at.saturating_duration_since(Instant::now());

        let joined = match timeout(budget, self.gateway.join(guild_id, channel_id)).await {
            Ok(result) => result,
            Err(_) => Err(VoiceError::JoinTimedOut {
                guild_id,
                channel_id,
            }),
        };

        if let Err(e) = joined {
            self.registry
                .write()
                .await
                .release_pending(channel_id, trigger.generation);

            if matches!(e, VoiceError::JoinTimedOut { .. }) {
                // The join future is gone but the library may hold a half-open call.
                self.release_abandoned(guild_id).await;
            }
            return Err(e);
        }

        let poll = self.start_poll(guild_id, channel_id);
        let promotion = self
            .registry
            .write()
            .await
            .promote(&trigger, poll, Instant::now());

        match promotion {
            Promotion::Connected => {
                tracing::info!(
                    "Connected to channel {} in guild {}, {:?} after the trigger",
                    channel_id,
                    guild_id,
                    trigger.first_observed_at.elapsed()
                );
                Ok(Connected::Staying)
            }
            Promotion::LeaveRequested => {
                self.leave_channel(guild_id, channel_id, LeaveReason::EmptiedWhileJoining)
                    .await;
                Ok(Connected::LeftImmediately)
            }
            Promotion::Stale => {
                self.release_abandoned(guild_id).await;
                Err(VoiceError::JoinTimedOut {
                    guild_id,
                    channel_id,
                })
            }
        }
    }

    fn start_poll(self: &Arc<Self>, guild_id: GuildId, channel_id: ChannelId) -> PollHandle {
        let controller = Arc::downgrade(self);

        start_occupancy_poll(self.settings.poll_interval, move || {
            let controller = controller.clone();
            async move {
                if let Some(controller) = controller.upgrade() {
                    controller.recheck(guild_id, channel_id).await;
                }
            }
        })
    }

    /// Ends the session in `channel_id` if there is one.
    ///
    /// # Returns
    /// - `true` - A session was ended by this call
    /// - `false` - No session there, someone else already ended it
    async fn leave_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        reason: LeaveReason,
    ) -> bool {
        let session = self.registry.write().await.end_session(guild_id, channel_id);

        match session {
            Some(session) => {
                self.close(session, reason).await;
                true
            }
            None => false,
        }
    }

    /// Final step for every session that has been removed from the registry.
    async fn close(&self, session: ActiveSession, reason: LeaveReason) {
        session.poll.cancel();

        if reason.releases_handle() {
            self.release_connection(session.guild_id).await;
        }

        tracing::info!(
            "Disconnected from channel {} in guild {} after {:?} ({})",
            session.channel_id,
            session.guild_id,
            session.started_at.elapsed(),
            reason
        );
    }

    /// Releases the connection of a join that was given up, unless a newer join or
    /// session in the guild now owns it.
    async fn release_abandoned(&self, guild_id: GuildId) {
        let idle = self
            .registry
            .write()
            .await
            .guild_is_idle(guild_id, Instant::now());

        if idle {
            self.release_connection(guild_id).await;
        } else {
            tracing::debug!(
                "Keeping connection in guild {}, a newer join or session owns it",
                guild_id
            );
        }
    }

    async fn release_connection(&self, guild_id: GuildId) {
        if let Err(e) = self.gateway.leave(guild_id).await {
            tracing::warn!("{}", e);
        }
    }
}

/// Decides the transition for one occupancy fact and applies its bookkeeping.
///
/// Runs entirely under the registry write lock.
fn decide(
    state: &mut RegistryState,
    occupancy: &ChannelOccupancy,
    settings: &ControllerSettings,
    now: Instant,
) -> Step {
    let guild_id = occupancy.guild_id;
    let channel_id = occupancy.channel_id;
    let qualifies = occupancy.qualifies(settings.threshold);

    if state.is_connected_to(guild_id, channel_id) {
        if occupancy.bot_is_alone() {
            return match state.end_session(guild_id, channel_id) {
                Some(session) => Step::Leave(session),
                None => Step::Nothing,
            };
        }

        return if qualifies {
            Step::Suppress(SuppressReason::Connected)
        } else {
            Step::Nothing
        };
    }

    if let Some(trigger) = state.pending_mut(channel_id, now) {
        let emptied = occupancy.non_bot_member_count == 0;
        if emptied != trigger.leave_requested {
            trigger.leave_requested = emptied;
            if emptied {
                return Step::QueueLeave;
            }
        }

        return if qualifies {
            Step::Suppress(SuppressReason::Pending)
        } else {
            Step::Nothing
        };
    }

    if !qualifies {
        return Step::Nothing;
    }

    if state.session_for_guild(guild_id).is_some()
        || state.pending_for_guild(guild_id, now).is_some()
    {
        return Step::Suppress(SuppressReason::GuildBusy);
    }

    if state.is_debounced(channel_id, now) {
        return Step::Suppress(SuppressReason::Debounced);
    }

    Step::Begin(state.begin_pending(guild_id, channel_id, now, settings.debounce_window))
}
