//! Test factories for Serenity API objects.
//!
//! The `*_json` functions return raw gateway payloads and are composed by
//! `GuildBuilder`. Objects a test needs on their own are exposed as `create_test_*`.
//!
//! # Available Factories
//!
//! - `voice_state::create_test_voice_state` - Create Serenity VoiceState objects
//! - `guild::create_test_guild` - Create an empty Serenity Guild

pub mod channel;
pub mod guild;
pub mod member;
pub mod user;
pub mod voice_state;

// Re-export commonly used functions for convenience
pub use guild::create_test_guild;
pub use voice_state::create_test_voice_state;
