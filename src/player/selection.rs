use std::time::{Duration, Instant};

use crate::{
    common::types::{MessageId, UserId},
    player::context::{Track, TrackContext},
};

/// Search results offered to one user, waiting for a numeric pick. At most
/// one lives per user per session; a newer search replaces it outright.
/// Expiry is checked lazily when a commit is attempted, never by a sweep.
#[derive(Debug, Clone)]
pub struct TrackSelection {
    pub choices: Vec<Track>,
    /// The message that listed the choices, so the host can edit it once
    /// the pick lands.
    pub out_msg_id: MessageId,
    pub user_id: UserId,
    pub created_at: Instant,
}

impl TrackSelection {
    pub fn new(user_id: UserId, choices: Vec<Track>, out_msg_id: MessageId) -> Self {
        Self {
            choices,
            out_msg_id,
            user_id,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        self.created_at.elapsed() > Duration::from_millis(ttl_ms)
    }
}

/// Result of a successful pick: the context that was enqueued, which
/// choice it was, and the presentation message the host may now edit.
#[derive(Debug, Clone)]
pub struct CommittedSelection {
    pub context: TrackContext,
    pub choice: usize,
    pub out_msg_id: MessageId,
}
