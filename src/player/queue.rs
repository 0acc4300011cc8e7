use std::collections::{HashSet, VecDeque};

use crate::{
    common::errors::QueueError,
    common::types::TrackId,
    player::context::TrackContext,
};

/// FIFO of pending tracks. Index 0 is the next track to play; the
/// currently playing track is held by the session, never in here.
#[derive(Debug, Default)]
pub struct TrackQueue {
    tracks: VecDeque<TrackContext>,
}

impl TrackQueue {
    pub fn push(&mut self, ctx: TrackContext) {
        self.tracks.push_back(ctx);
    }

    pub fn pop_next(&mut self) -> Option<TrackContext> {
        self.tracks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackContext> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackContext> {
        self.tracks.iter()
    }

    /// Read-only slice in play order. Bounds are validated here so callers
    /// get a typed error instead of a panic on misuse.
    pub fn snapshot(&self, start: usize, end: usize) -> Result<Vec<TrackContext>, QueueError> {
        if end < start || end > self.tracks.len() {
            return Err(QueueError::Range {
                start,
                end,
                len: self.tracks.len(),
            });
        }
        Ok(self.tracks.range(start..end).cloned().collect())
    }

    /// Removes every queued track whose id is in `ids`, keeping the
    /// relative order of the survivors. Returns how many were removed.
    pub fn remove_ids(&mut self, ids: &HashSet<TrackId>) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|ctx| !ids.contains(&ctx.track_id));
        before - self.tracks.len()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Random permutation of the pending tracks.
    pub fn shuffle(&mut self) {
        use rand::seq::SliceRandom;
        self.tracks
            .make_contiguous()
            .shuffle(&mut rand::thread_rng());
    }

    /// Sum of the pending tracks' durations in milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        self.tracks.iter().map(|ctx| ctx.track.length_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::UserId;
    use crate::player::context::Track;

    fn queued(title: &str, user: u64) -> TrackContext {
        TrackContext::new(
            Track {
                identifier: title.to_string(),
                title: title.to_string(),
                author: "author".to_string(),
                length_ms: 1000,
                uri: None,
                source_name: "test".to_string(),
            },
            UserId(user),
        )
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut queue = TrackQueue::default();
        for title in ["a", "b", "c", "d"] {
            queue.push(queued(title, 1));
        }

        let all = queue.snapshot(0, 4).expect("full range is valid");
        let titles: Vec<&str> = all.iter().map(|ctx| ctx.title()).collect();
        assert_eq!(titles, ["a", "b", "c", "d"]);

        let middle = queue.snapshot(1, 3).expect("inner range is valid");
        let titles: Vec<&str> = middle.iter().map(|ctx| ctx.title()).collect();
        assert_eq!(titles, ["b", "c"]);
    }

    #[test]
    fn test_snapshot_rejects_bad_ranges() {
        let mut queue = TrackQueue::default();
        queue.push(queued("a", 1));
        queue.push(queued("b", 1));

        assert_eq!(
            queue.snapshot(2, 1),
            Err(QueueError::Range {
                start: 2,
                end: 1,
                len: 2
            })
        );
        assert_eq!(
            queue.snapshot(0, 3),
            Err(QueueError::Range {
                start: 0,
                end: 3,
                len: 2
            })
        );
    }

    #[test]
    fn test_remove_ids_keeps_survivor_order() {
        let mut queue = TrackQueue::default();
        let a = queued("a", 1);
        let b = queued("b", 2);
        let c = queued("c", 1);
        let d = queued("d", 3);
        let removed: HashSet<TrackId> = [a.track_id, c.track_id].into_iter().collect();
        for ctx in [a, b, c, d] {
            queue.push(ctx);
        }

        assert_eq!(queue.remove_ids(&removed), 2);
        let titles: Vec<&str> = queue.iter().map(|ctx| ctx.title()).collect();
        assert_eq!(titles, ["b", "d"]);
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut queue = TrackQueue::default();
        let mut ids = Vec::new();
        for i in 0..32 {
            let ctx = queued(&format!("t{}", i), 1);
            ids.push(ctx.track_id);
            queue.push(ctx);
        }

        queue.shuffle();

        let mut shuffled: Vec<TrackId> = queue.iter().map(|ctx| ctx.track_id).collect();
        shuffled.sort();
        ids.sort();
        assert_eq!(shuffled, ids);
    }
}
