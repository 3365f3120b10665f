//! Raw Serenity GuildChannel payloads.

use serde_json::Value;
use serenity::all::ChannelType;

/// Raw guild channel payload.
///
/// Voice channels get a bitrate and an unlimited user limit; other kinds leave
/// those fields null.
pub fn channel_json(guild_id: u64, channel_id: u64, name: &str, kind: ChannelType) -> Value {
    let is_voice = matches!(kind, ChannelType::Voice | ChannelType::Stage);
    let bitrate: Option<u32> = is_voice.then_some(64_000);
    let user_limit: Option<u32> = is_voice.then_some(0);

    serde_json::json!({
        "id": channel_id.to_string(),
        "guild_id": guild_id.to_string(),
        "type": kind,
        "name": name,
        "position": 0,
        "permission_overwrites": [],
        "nsfw": false,
        "parent_id": null,
        "bitrate": bitrate,
        "user_limit": user_limit,
        "rtc_region": null,
        "topic": null,
        "last_message_id": null,
        "rate_limit_per_user": 0,
        "flags": 0,
    })
}
