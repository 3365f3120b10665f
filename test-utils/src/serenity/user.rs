//! Raw Serenity User payloads.

use serde_json::Value;

/// Raw user payload.
///
/// # Arguments
/// - `user_id` - Discord user ID (snowflake)
/// - `name` - Username
/// - `bot` - Whether the account is a bot
pub fn user_json(user_id: u64, name: &str, bot: bool) -> Value {
    serde_json::json!({
        "id": user_id.to_string(),
        "username": name,
        "discriminator": "0",
        "global_name": null,
        "avatar": null,
        "bot": bot,
    })
}
