//! Songbird implementation of the voice gateway.
//!
//! Joins register a driver-disconnect handler on the call that forwards connection
//! failures to the controller over an unbounded channel. Playback waits on a oneshot
//! completed by track end/error events, bounded by `PLAYBACK_TIMEOUT`.

use std::path::Path;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};
use serenity::async_trait;
use songbird::error::JoinError;
use songbird::input::File;
use songbird::tracks::{ControlError, PlayMode, Track};
use songbird::{
    CoreEvent, Event, EventContext, EventHandler as VoiceEventHandler, Songbird, TrackEvent,
};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;

use crate::config::PLAYBACK_TIMEOUT;
use crate::error::{playback::PlaybackError, voice::VoiceError};
use crate::model::connection::{ConnectionEvent, ConnectionEventKind};
use crate::service::gateway::VoiceGateway;

pub struct SongbirdGateway {
    manager: Arc<Songbird>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl SongbirdGateway {
    /// # Arguments
    /// - `manager` - The songbird instance registered on the serenity client
    /// - `events` - Sink for driver disconnects, drained into the controller
    pub fn new(manager: Arc<Songbird>, events: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        Self { manager, events }
    }
}

#[async_trait]
impl VoiceGateway for SongbirdGateway {
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), VoiceError> {
        match self.manager.join(guild_id, channel_id).await {
            Ok(call) => {
                let mut handler = call.lock().await;

                // A reused call may still carry the notifier of an earlier session.
                handler.remove_all_global_events();
                handler.add_global_event(
                    Event::Core(CoreEvent::DriverDisconnect),
                    DisconnectNotifier {
                        guild_id,
                        events: self.events.clone(),
                    },
                );

                Ok(())
            }
            Err(e) => {
                // Release whatever half of the connection did open.
                if let Err(leave_err) = self.manager.remove(guild_id).await {
                    if !matches!(leave_err, JoinError::NoCall) {
                        tracing::warn!(
                            "Failed to release half-open connection in guild {}: {}",
                            guild_id,
                            leave_err
                        );
                    }
                }

                Err(VoiceError::JoinFailed {
                    guild_id,
                    channel_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn play(
        &self,
        guild_id: GuildId,
        clip: &Path,
        volume: f32,
    ) -> Result<(), PlaybackError> {
        if !clip.is_file() {
            return Err(PlaybackError::MissingAsset(clip.to_path_buf()));
        }

        let call = self
            .manager
            .get(guild_id)
            .ok_or(PlaybackError::NoConnection(guild_id))?;

        let (tx, rx) = oneshot::channel();
        let notifier = PlaybackNotifier {
            done: Arc::new(Mutex::new(Some(tx))),
        };

        let track = Track::new(File::new(clip.to_path_buf()).into()).volume(volume);

        let handle = {
            let mut handler = call.lock().await;
            let handle = handler.play(track);

            for event in [TrackEvent::End, TrackEvent::Error] {
                match handle.add_event(Event::Track(event), notifier.clone()) {
                    Ok(()) => {}
                    // Ended before we could listen; nothing left to wait for.
                    Err(ControlError::Finished) => return Ok(()),
                    Err(e) => return Err(PlaybackError::Track(e.to_string())),
                }
            }

            handle
        };

        match timeout(PLAYBACK_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(PlaybackError::Track(
                "track dropped without reporting".to_string(),
            )),
            Err(_) => {
                let _ = handle.stop();
                Err(PlaybackError::TimedOut(PLAYBACK_TIMEOUT))
            }
        }
    }

    async fn leave(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        match self.manager.remove(guild_id).await {
            Ok(()) | Err(JoinError::NoCall) => Ok(()),
            Err(e) => Err(VoiceError::LeaveFailed {
                guild_id,
                reason: e.to_string(),
            }),
        }
    }
}

/// Forwards driver disconnects of one guild's call.
///
/// Songbird reports no reason when the disconnect was requested locally, which is
/// treated as a destroyed connection; any reason is a connection error.
struct DisconnectNotifier {
    guild_id: GuildId,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

#[async_trait]
impl VoiceEventHandler for DisconnectNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::DriverDisconnect(data) = ctx {
            let kind = match &data.reason {
                None => ConnectionEventKind::Destroyed,
                Some(reason) => {
                    ConnectionEventKind::Error(format!("{:?} ({:?})", reason, data.kind))
                }
            };

            if self
                .events
                .send(ConnectionEvent {
                    guild_id: self.guild_id,
                    kind,
                })
                .is_err()
            {
                tracing::debug!(
                    "Connection event for guild {} dropped, controller is gone",
                    self.guild_id
                );
            }
        }

        None
    }
}

/// Completes the playback oneshot on the first end or error event.
#[derive(Clone)]
struct PlaybackNotifier {
    done: Arc<Mutex<Option<oneshot::Sender<Result<(), PlaybackError>>>>>,
}

#[async_trait]
impl VoiceEventHandler for PlaybackNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let EventContext::Track(tracks) = ctx else {
            return None;
        };

        let result = match tracks.first().map(|(state, _)| &state.playing) {
            Some(PlayMode::Errored(e)) => Err(PlaybackError::Track(format!("{:?}", e))),
            _ => Ok(()),
        };

        if let Some(tx) = self.done.lock().await.take() {
            let _ = tx.send(result);
        }

        Some(Event::Cancel)
    }
}
