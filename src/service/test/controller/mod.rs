use std::path::PathBuf;
use std::time::Duration;

use serenity::all::{ChannelId, GuildId};
use tokio::time::{sleep, Instant};

use crate::error::{voice::VoiceError, AppError};
use crate::model::connection::{ConnectionEvent, ConnectionEventKind};
use crate::service::controller::{Outcome, Summon, SuppressReason};
use crate::service::test::fake::{FakeVoiceGateway, VoiceCall};

use super::{channel_id, guild_id, occupancy, occupancy_in, Harness, CLIP};

mod connection;
mod trigger;
