use std::path::PathBuf;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};

use crate::config::ControllerSettings;
use crate::model::occupancy::ChannelOccupancy;
use crate::service::controller::JoinLeaveController;
use crate::service::registry::SessionRegistry;
use crate::service::test::fake::{FakeOccupancyProbe, FakeVoiceGateway};

mod controller;

const CLIP: &str = "sounds/notification.mp3";

fn guild_id() -> GuildId {
    GuildId::new(1_000)
}

fn channel_id() -> ChannelId {
    ChannelId::new(2_000)
}

/// Occupancy of the default test channel.
fn occupancy(total: usize, non_bot: usize, bot_present: bool) -> ChannelOccupancy {
    occupancy_in(guild_id(), channel_id(), total, non_bot, bot_present)
}

fn occupancy_in(
    guild_id: GuildId,
    channel_id: ChannelId,
    total: usize,
    non_bot: usize,
    bot_present: bool,
) -> ChannelOccupancy {
    ChannelOccupancy {
        guild_id,
        channel_id,
        total_member_count: total,
        non_bot_member_count: non_bot,
        bot_present,
    }
}

/// Controller wired to fresh fakes, with handles kept for assertions.
struct Harness {
    controller: Arc<JoinLeaveController>,
    registry: SessionRegistry,
    gateway: Arc<FakeVoiceGateway>,
    probe: Arc<FakeOccupancyProbe>,
}

impl Harness {
    fn new(gateway: FakeVoiceGateway) -> Self {
        let settings = ControllerSettings {
            notification_sound_path: PathBuf::from(CLIP),
            ..ControllerSettings::default()
        };
        let registry = SessionRegistry::new();
        let gateway = Arc::new(gateway);
        let probe = Arc::new(FakeOccupancyProbe::default());

        let controller = JoinLeaveController::new(
            settings,
            registry.clone(),
            gateway.clone(),
            probe.clone(),
        );

        Self {
            controller,
            registry,
            gateway,
            probe,
        }
    }

    async fn session_count(&self) -> usize {
        self.registry.read().await.session_count()
    }

    async fn pending_count(&self) -> usize {
        self.registry.read().await.pending_count()
    }
}
