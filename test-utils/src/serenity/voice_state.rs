//! Test factory for creating Serenity VoiceState objects.

use serde_json::Value;
use serenity::all::VoiceState;

/// Raw voice state payload.
///
/// # Arguments
/// - `guild_id` - Guild of the voice state
/// - `user_id` - User the state belongs to
/// - `channel_id` - Connected channel, `None` once the user has disconnected
/// - `member` - Optional member payload attached by the gateway
pub fn voice_state_json(
    guild_id: u64,
    user_id: u64,
    channel_id: Option<u64>,
    member: Option<Value>,
) -> Value {
    serde_json::json!({
        "guild_id": guild_id.to_string(),
        "channel_id": channel_id.map(|id| id.to_string()),
        "user_id": user_id.to_string(),
        "member": member,
        "session_id": format!("session-{}", user_id),
        "deaf": false,
        "mute": false,
        "self_deaf": false,
        "self_mute": false,
        "self_stream": false,
        "self_video": false,
        "suppress": false,
        "request_to_speak_timestamp": null,
    })
}

/// Creates a test Serenity VoiceState without an attached member.
///
/// # Panics
/// - If the JSON cannot be deserialized into a VoiceState (indicates invalid test data)
///
/// # Examples
///
/// ```rust,ignore
/// use test_utils::serenity::voice_state::create_test_voice_state;
///
/// // User 100 joined channel 10
/// let joined = create_test_voice_state(1, 100, Some(10));
///
/// // User 100 disconnected
/// let left = create_test_voice_state(1, 100, None);
/// ```
pub fn create_test_voice_state(guild_id: u64, user_id: u64, channel_id: Option<u64>) -> VoiceState {
    serde_json::from_value(voice_state_json(guild_id, user_id, channel_id, None))
        .expect("Failed to create test voice state - invalid JSON structure")
}
