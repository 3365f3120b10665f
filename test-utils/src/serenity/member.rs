//! Raw Serenity Member payloads.

use serde_json::Value;

use super::user::user_json;

/// Raw guild member payload with no roles and no nickname.
pub fn member_json(guild_id: u64, user_id: u64, name: &str, bot: bool) -> Value {
    serde_json::json!({
        "guild_id": guild_id.to_string(),
        "user": user_json(user_id, name, bot),
        "nick": null,
        "avatar": null,
        "roles": [],
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "communication_disabled_until": null,
    })
}
