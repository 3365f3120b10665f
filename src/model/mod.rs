//! Domain models shared by the watcher, the controller and the bot glue.
//!
//! - `occupancy` - derived per-event view of a voice channel
//! - `session` - pending triggers and active voice sessions held by the registry
//! - `connection` - status reports coming back from the voice library

pub mod connection;
pub mod occupancy;
pub mod session;
