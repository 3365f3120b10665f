//! Text commands understood by the bot.

pub const PONG_REPLY: &str = "🏓 Pong!";
pub const TEST_AUDIO_REPLY: &str = "🎵 Testing audio...";
pub const NOT_IN_VOICE_REPLY: &str = "❌ You must be in a voice channel to test the audio";
pub const GUILD_BUSY_REPLY: &str = "❌ I'm already in another voice channel of this server";
pub const JOIN_FAILED_REPLY: &str = "❌ Could not join your voice channel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!ping`
    Ping,
    /// `!test-audio`: join the caller's voice channel and play the notification.
    TestAudio,
}

impl Command {
    /// Parses a message body. Only exact matches are commands.
    pub fn parse(content: &str) -> Option<Self> {
        match content {
            "!ping" => Some(Command::Ping),
            "!test-audio" => Some(Command::TestAudio),
            _ => None,
        }
    }
}
