//! Join/leave policy for voice channels.
//!
//! - `watcher` turns voice state notifications into `ChannelOccupancy` facts
//! - `controller` applies the join/leave state machine to those facts
//! - `registry` holds pending triggers, debounce stamps and active sessions
//! - `gateway` defines the traits the controller uses to reach the voice library

pub mod controller;
pub mod gateway;
pub mod registry;
pub mod watcher;

#[cfg(test)]
mod test;
