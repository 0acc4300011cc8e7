use serde::Serialize;

use crate::{
    common::types::GuildId,
    player::context::{Track, TrackContext},
};

/// Events emitted by the player over the registry's event channel.
/// Observers (announcement rendering, metrics) consume these; the core
/// never waits on them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    #[serde(rename = "TrackStartEvent")]
    #[serde(rename_all = "camelCase")]
    TrackStart { guild_id: GuildId, track: Track },

    #[serde(rename = "TrackEndEvent")]
    #[serde(rename_all = "camelCase")]
    TrackEnd {
        guild_id: GuildId,
        track: Track,
        reason: TrackEndReason,
    },

    /// The queue drained and nothing is current any more.
    #[serde(rename = "QueueEndEvent")]
    #[serde(rename_all = "camelCase")]
    QueueEnd { guild_id: GuildId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackEndReason {
    Finished,
    Skipped,
    Stopped,
    Cleanup,
}

impl PlayerEvent {
    pub(crate) fn track_end(guild_id: GuildId, ctx: TrackContext, reason: TrackEndReason) -> Self {
        Self::TrackEnd {
            guild_id,
            track: ctx.track,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging_matches_wire_names() {
        let event = PlayerEvent::QueueEnd {
            guild_id: GuildId::from("g1"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "QueueEndEvent");
        assert_eq!(json["guildId"], "g1");

        let event = PlayerEvent::TrackStart {
            guild_id: GuildId::from("g1"),
            track: Track {
                identifier: "id".to_string(),
                title: "title".to_string(),
                author: "author".to_string(),
                length_ms: 1000,
                uri: None,
                source_name: "test".to_string(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TrackStartEvent");
        assert_eq!(json["track"]["lengthMs"], 1000);
    }
}
