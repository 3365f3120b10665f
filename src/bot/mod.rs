//! Discord integration.
//!
//! Wires the serenity client and the songbird voice manager to the join/leave
//! controller. Serenity's cache is the source of truth for who sits in which voice
//! channel; songbird owns the voice connections.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild and channel data for the cache
//! - `GUILD_VOICE_STATES` - Voice state updates, the join/leave trigger
//! - `GUILD_MESSAGES` - Text commands
//! - `MESSAGE_CONTENT` - Reading the command text (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod cache;
pub mod command;
pub mod handler;
pub mod start;
pub mod voice;
