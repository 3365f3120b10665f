use serenity::all::GuildId;

/// Unsolicited status change reported by the voice library for a guild's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub guild_id: GuildId,
    pub kind: ConnectionEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEventKind {
    /// The connection failed; the handle may still be held and must be released.
    Error(String),
    /// The connection is already gone.
    Destroyed,
}
