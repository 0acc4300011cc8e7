use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::common::types::{TrackId, UserId};

/// Track ids are process-unique and monotonically increasing so that two
/// sessions can never hand out the same handle.
static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Metadata of a playable item as delivered by a search provider. The core
/// never interprets these fields beyond display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub identifier: String,
    pub title: String,
    pub author: String,
    /// Duration in milliseconds; 0 for live streams.
    pub length_ms: u64,
    pub uri: Option<String>,
    pub source_name: String,
}

/// A track accepted into a guild's queue: the playable item paired with
/// the user who queued it and its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackContext {
    pub track: Track,
    pub requester: UserId,
    pub track_id: TrackId,
}

impl TrackContext {
    /// Wraps a track for queueing, assigning it a fresh id.
    pub fn new(track: Track, requester: UserId) -> Self {
        Self {
            track,
            requester,
            track_id: TrackId(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn title(&self) -> &str {
        &self.track.title
    }
}
