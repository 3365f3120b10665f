//! Background tasks owned by voice sessions.
//!
//! The only recurring work is the occupancy poll that notices when the bot has been
//! left alone in a channel, since the bot's own presence does not always produce a
//! voice state event.

pub mod occupancy_poll;
