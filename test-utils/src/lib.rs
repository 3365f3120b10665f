//! Crowdchime Test Utils
//!
//! Shared helpers for testing code that reads Serenity models. Discord objects are
//! built by deserializing JSON shaped like the gateway payloads, so tests work with the
//! same structs the cache hands to the bot.
//!
//! # Overview
//!
//! - **GuildBuilder**: Fluent builder for a guild with voice channels, members and
//!   voice states
//! - **serenity**: Raw payload factories plus standalone `Guild` and `VoiceState` objects
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::GuildBuilder;
//!
//! #[test]
//! fn counts_members() {
//!     let guild = GuildBuilder::new(1)
//!         .with_voice_channel(10, "General")
//!         .with_connected_member(100, "alice", false, 10)
//!         .build();
//!
//!     assert_eq!(guild.voice_states.len(), 1);
//! }
//! ```

pub mod builder;
pub mod serenity;
