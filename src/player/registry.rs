use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    api::events::PlayerEvent,
    common::types::GuildId,
    configs::PlayerConfig,
    player::{
        output::{AudioOutput, NullOutput},
        session::GuildSession,
    },
};

/// Process-wide guild-to-session map and the sole entry point collaborators
/// use to reach a guild's state. Sessions are created lazily; DashMap's
/// entry API guarantees racing first accesses converge on one instance,
/// and lookups for different guilds never serialize against each other.
pub struct PlayerRegistry {
    players: DashMap<GuildId, Arc<GuildSession>>,
    config: PlayerConfig,
    audio: Arc<dyn AudioOutput>,
    events_tx: flume::Sender<PlayerEvent>,
    events_rx: flume::Receiver<PlayerEvent>,
}

impl PlayerRegistry {
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_output(config, Arc::new(NullOutput))
    }

    pub fn with_output(config: PlayerConfig, audio: Arc<dyn AudioOutput>) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            players: DashMap::new(),
            config,
            audio,
            events_tx,
            events_rx,
        }
    }

    /// The session for a guild, created on first access. Never none.
    pub fn get(&self, guild_id: &GuildId) -> Arc<GuildSession> {
        self.players
            .entry(guild_id.clone())
            .or_insert_with(|| {
                tracing::info!("creating player session for guild {}", guild_id);
                Arc::new(GuildSession::new(
                    guild_id.clone(),
                    self.config.clone(),
                    self.audio.clone(),
                    self.events_tx.clone(),
                ))
            })
            .clone()
    }

    /// Tear down and discard a guild's session. Pending selections go with
    /// it; a later `get` starts fresh.
    pub fn remove(&self, guild_id: &GuildId) {
        if let Some((_, session)) = self.players.remove(guild_id) {
            session.teardown();
        }
    }

    /// Player event stream. Clone-able; events pile up until somebody
    /// drains them, so long-lived hosts should keep a consumer attached.
    pub fn events(&self) -> flume::Receiver<PlayerEvent> {
        self.events_rx.clone()
    }

    pub fn total_players(&self) -> usize {
        self.players.len()
    }

    pub fn playing_players(&self) -> usize {
        self.players
            .iter()
            .filter(|entry| entry.value().current_track().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{MessageId, UserId};
    use crate::player::context::Track;

    fn track(title: &str) -> Track {
        Track {
            identifier: title.to_string(),
            title: title.to_string(),
            author: "author".to_string(),
            length_ms: 1000,
            uri: None,
            source_name: "test".to_string(),
        }
    }

    #[test]
    fn test_get_returns_one_instance_per_guild() {
        let registry = PlayerRegistry::new(PlayerConfig::default());
        let a = registry.get(&GuildId::from("g1"));
        let b = registry.get(&GuildId::from("g1"));
        let other = registry.get(&GuildId::from("g2"));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(registry.total_players(), 2);
    }

    #[test]
    fn test_concurrent_first_access_converges() {
        let registry = Arc::new(PlayerRegistry::new(PlayerConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get(&GuildId::from("race")))
            })
            .collect();

        let sessions: Vec<Arc<GuildSession>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
        assert_eq!(registry.total_players(), 1);
    }

    #[test]
    fn test_remove_discards_state_and_recreates_fresh() {
        let registry = PlayerRegistry::new(PlayerConfig::default());
        let guild = GuildId::from("g1");

        let session = registry.get(&guild);
        session.enqueue(track("a"), UserId(1));
        session.offer_selection(UserId(1), vec![track("b")], MessageId(1));
        registry.remove(&guild);

        // The old handle was cleared, and a new get starts empty.
        assert!(session.is_empty());
        assert!(!session.has_selection(UserId(1)));
        let fresh = registry.get(&guild);
        assert!(!Arc::ptr_eq(&session, &fresh));
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_playing_players_counts_active_sessions() {
        let registry = PlayerRegistry::new(PlayerConfig::default());
        let playing = registry.get(&GuildId::from("g1"));
        playing.enqueue(track("a"), UserId(1));
        playing.ensure_playing();
        registry.get(&GuildId::from("g2"));

        assert_eq!(registry.total_players(), 2);
        assert_eq!(registry.playing_players(), 1);
    }
}
