use crate::{common::types::GuildId, player::context::Track};

/// Boundary to the audio transport. The core only decides *which* track a
/// guild should currently be playing; decode and stream state live behind
/// this trait.
///
/// Calls are issued while the owning session holds its state lock, so
/// implementations must hand work off instead of blocking.
pub trait AudioOutput: Send + Sync {
    fn start(&self, guild_id: &GuildId, track: &Track);
    fn stop(&self, guild_id: &GuildId);
    fn set_pause(&self, guild_id: &GuildId, paused: bool);
    fn set_volume(&self, guild_id: &GuildId, volume: i32);
}

/// No-op output for hosts without a voice backend and for tests.
#[derive(Debug, Default)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn start(&self, guild_id: &GuildId, track: &Track) {
        tracing::debug!("null output: start {} in guild {}", track.identifier, guild_id);
    }

    fn stop(&self, _guild_id: &GuildId) {}

    fn set_pause(&self, _guild_id: &GuildId, _paused: bool) {}

    fn set_volume(&self, _guild_id: &GuildId, _volume: i32) {}
}
