//! Test factory for creating Serenity Guild objects.
//!
//! This module provides the base guild payload used by `GuildBuilder`. The guild is
//! created by deserializing JSON, simulating what Discord's gateway sends in
//! `GUILD_CREATE`.

use serde_json::Value;
use serenity::all::Guild;

/// Raw guild payload with the given channels, members and voice states.
///
/// All other fields are set to reasonable defaults.
pub fn guild_json(
    guild_id: u64,
    name: &str,
    channels: Vec<Value>,
    members: Vec<Value>,
    voice_states: Vec<Value>,
) -> Value {
    serde_json::json!({
        "id": guild_id.to_string(),
        "name": name,
        "icon": null,
        "icon_hash": null,
        "owner_id": "100000000000000000",
        "afk_timeout": 300,
        "verification_level": 0,
        "default_message_notifications": 0,
        "explicit_content_filter": 0,
        "roles": [],
        "emojis": [],
        "stickers": [],
        "features": [],
        "mfa_level": 0,
        "system_channel_flags": 0,
        "premium_tier": 0,
        "premium_subscription_count": 0,
        "premium_progress_bar_enabled": false,
        "preferred_locale": "en-US",
        "nsfw_level": 0,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "large": false,
        "member_count": members.len(),
        "voice_states": voice_states,
        "channels": channels,
        "threads": [],
        "presences": [],
        "max_presences": 25000,
        "max_members": 100000,
        "unavailable": false,
        "members": members,
        "stage_instances": [],
        "guild_scheduled_events": [],
    })
}

/// Creates a test Serenity Guild with no channels, members or voice states.
///
/// # Panics
/// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
pub fn create_test_guild(guild_id: u64, name: &str) -> Guild {
    serde_json::from_value(guild_json(guild_id, name, vec![], vec![], vec![]))
        .expect("Failed to create test guild - invalid JSON structure")
}
