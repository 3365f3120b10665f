use std::sync::{Arc, OnceLock};

use serenity::all::{Cache, ChannelId, GuildId};

use crate::model::occupancy::ChannelOccupancy;
use crate::service::gateway::OccupancyProbe;
use crate::service::watcher::MembershipWatcher;

/// Occupancy lookup backed by serenity's cache.
///
/// The controller is built before the client exists, so the cache is attached once the
/// client has been created. Until then every lookup returns `None`.
#[derive(Default)]
pub struct CacheProbe {
    cache: OnceLock<Arc<Cache>>,
}

impl CacheProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, cache: Arc<Cache>) {
        if self.cache.set(cache).is_err() {
            tracing::warn!("Cache already attached to occupancy probe");
        }
    }
}

impl OccupancyProbe for CacheProbe {
    fn occupancy(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelOccupancy> {
        let cache = self.cache.get()?;
        let watcher = MembershipWatcher::new(cache.current_user().id);
        let guild = cache.guild(guild_id)?;

        watcher.occupancy(&guild, channel_id)
    }
}
