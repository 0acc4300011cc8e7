use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::{
    api::{
        events::{PlayerEvent, TrackEndReason},
        outcome::SkipOutcome,
    },
    common::errors::{QueueError, SelectionError, SkipError},
    common::types::{ChannelId, GuildId, MessageId, PermissionLevel, TrackId, UserId},
    configs::PlayerConfig,
    player::{
        context::{Track, TrackContext},
        output::AudioOutput,
        queue::TrackQueue,
        selection::{CommittedSelection, TrackSelection},
        skip,
    },
};

/// Everything a guild's player owns. Mutators run under the write lock for
/// their whole resolve-and-commit extent; snapshot reads share the read
/// lock and observe a consistent point in time.
struct SessionState {
    queue: TrackQueue,
    /// The track the audio output should currently be playing. Never also
    /// present in `queue`.
    current: Option<TrackContext>,
    paused: bool,
    volume: i32,
    /// Text destination replies and announcements go to.
    active_channel: Option<ChannelId>,
    selections: HashMap<UserId, TrackSelection>,
    last_skip: Option<Instant>,
}

/// Per-guild playback session. One instance per guild, handed out by the
/// registry; sessions for different guilds never contend on a lock.
pub struct GuildSession {
    guild_id: GuildId,
    config: PlayerConfig,
    audio: Arc<dyn AudioOutput>,
    events: flume::Sender<PlayerEvent>,
    state: RwLock<SessionState>,
}

impl GuildSession {
    pub fn new(
        guild_id: GuildId,
        config: PlayerConfig,
        audio: Arc<dyn AudioOutput>,
        events: flume::Sender<PlayerEvent>,
    ) -> Self {
        let volume = config.volume;
        Self {
            guild_id,
            config,
            audio,
            events,
            state: RwLock::new(SessionState {
                queue: TrackQueue::default(),
                current: None,
                paused: false,
                volume,
                active_channel: None,
                selections: HashMap::new(),
                last_skip: None,
            }),
        }
    }

    pub fn guild_id(&self) -> &GuildId {
        &self.guild_id
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    /// Pop the queue head into `current` and start it, or report the end
    /// of the queue. Must run under the write lock.
    fn start_next_locked(&self, state: &mut SessionState) {
        match state.queue.pop_next() {
            Some(next) => {
                self.audio.start(&self.guild_id, &next.track);
                self.emit(PlayerEvent::TrackStart {
                    guild_id: self.guild_id.clone(),
                    track: next.track.clone(),
                });
                state.current = Some(next);
            }
            None => {
                state.current = None;
                self.emit(PlayerEvent::QueueEnd {
                    guild_id: self.guild_id.clone(),
                });
            }
        }
    }

    // ---- queue operations ----

    /// Append a track to the tail of the queue. Permission checks are the
    /// caller's responsibility.
    pub fn enqueue(&self, track: Track, requester: UserId) -> TrackId {
        let ctx = TrackContext::new(track, requester);
        let track_id = ctx.track_id;
        let mut state = self.state.write();
        state.queue.push(ctx);
        tracing::debug!(
            "queued track {} for {} in guild {}",
            track_id,
            requester,
            self.guild_id
        );
        track_id
    }

    /// Read-only slice of the pending queue, index 0 being next to play.
    pub fn queue_snapshot(&self, start: usize, end: usize) -> Result<Vec<TrackContext>, QueueError> {
        self.state.read().queue.snapshot(start, end)
    }

    pub fn current_track(&self) -> Option<TrackContext> {
        self.state.read().current.clone()
    }

    /// True iff the queue is empty and nothing is current.
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.current.is_none() && state.queue.is_empty()
    }

    /// Current track plus everything still queued.
    pub fn track_count(&self) -> usize {
        let state = self.state.read();
        usize::from(state.current.is_some()) + state.queue.len()
    }

    /// Milliseconds of playback left, counting the current track at full
    /// length (the core does not track positions).
    pub fn remaining_time_ms(&self) -> u64 {
        let state = self.state.read();
        let current = state
            .current
            .as_ref()
            .map(|ctx| ctx.track.length_ms)
            .unwrap_or(0);
        current + state.queue.remaining_ms()
    }

    /// Move on past the current track, e.g. once the audio output reports
    /// it finished.
    pub fn advance(&self) {
        let mut state = self.state.write();
        if let Some(prev) = state.current.take() {
            self.emit(PlayerEvent::track_end(
                self.guild_id.clone(),
                prev,
                TrackEndReason::Finished,
            ));
        }
        self.start_next_locked(&mut state);
    }

    /// Start playback if nothing is current and the queue has tracks.
    /// Idempotent. Returns whether something is playing afterwards.
    pub fn ensure_playing(&self) -> bool {
        let mut state = self.state.write();
        if state.current.is_some() {
            return true;
        }
        if state.queue.is_empty() {
            return false;
        }
        self.start_next_locked(&mut state);
        state.current.is_some()
    }

    /// Drop the queue and stop the current track.
    pub fn stop(&self) {
        let mut state = self.state.write();
        state.queue.clear();
        if let Some(prev) = state.current.take() {
            self.audio.stop(&self.guild_id);
            self.emit(PlayerEvent::track_end(
                self.guild_id.clone(),
                prev,
                TrackEndReason::Stopped,
            ));
        }
    }

    /// Random permutation of the pending queue; the current track is not
    /// part of it.
    pub fn shuffle(&self) {
        self.state.write().queue.shuffle();
    }

    // ---- skip ----

    /// Resolve and commit a skip request in one critical section, so two
    /// racing invocations can never both claim the same track.
    pub fn skip(
        &self,
        invoker: UserId,
        level: PermissionLevel,
        args: &[String],
    ) -> Result<SkipOutcome, SkipError> {
        let mut state = self.state.write();

        if state.current.is_none() && state.queue.is_empty() {
            return Ok(SkipOutcome::QueueEmpty);
        }

        // Fixed-window cooldown absorbs double submits. Dropped calls
        // mutate nothing and must stay silent; a zero window disables it.
        if self.config.skip_cooldown_ms > 0 {
            let window = Duration::from_millis(self.config.skip_cooldown_ms);
            if let Some(last) = state.last_skip {
                if last.elapsed() <= window {
                    tracing::debug!("skip inside cooldown window in guild {}", self.guild_id);
                    return Ok(SkipOutcome::Cooldown);
                }
            }
            state.last_skip = Some(Instant::now());
        }

        let arg = skip::parse_args(args)?;
        let resolved = skip::resolve(state.current.as_ref(), &state.queue, &arg)?;
        skip::check_ownership(&resolved.tracks, invoker, level)?;

        if resolved.tracks.is_empty() {
            return Ok(resolved.outcome);
        }

        let ids: HashSet<TrackId> = resolved.tracks.iter().map(|ctx| ctx.track_id).collect();
        let removed = state.queue.remove_ids(&ids);
        tracing::debug!(
            "skipping {} queued track(s) in guild {}",
            removed,
            self.guild_id
        );

        let current_hit = state
            .current
            .as_ref()
            .is_some_and(|cur| ids.contains(&cur.track_id));
        if current_hit {
            if let Some(prev) = state.current.take() {
                self.audio.stop(&self.guild_id);
                self.emit(PlayerEvent::track_end(
                    self.guild_id.clone(),
                    prev,
                    TrackEndReason::Skipped,
                ));
            }
            self.start_next_locked(&mut state);
        }

        Ok(resolved.outcome)
    }

    // ---- selection ----

    /// Store search results for one user, replacing any pending offer.
    pub fn offer_selection(&self, user: UserId, choices: Vec<Track>, out_msg_id: MessageId) {
        let mut state = self.state.write();
        let replaced = state
            .selections
            .insert(user, TrackSelection::new(user, choices, out_msg_id))
            .is_some();
        if replaced {
            tracing::debug!(
                "replaced pending selection for {} in guild {}",
                user,
                self.guild_id
            );
        }
    }

    pub fn has_selection(&self, user: UserId) -> bool {
        self.state.read().selections.contains_key(&user)
    }

    /// Commit a numeric pick. An out-of-range choice leaves the offer
    /// intact; a stale offer is discarded on this access path rather than
    /// by a background sweep. The chosen track is queued under the
    /// offering user's ownership and playback is resumed.
    pub fn commit_selection(
        &self,
        user: UserId,
        choice: usize,
    ) -> Result<CommittedSelection, SelectionError> {
        let mut state = self.state.write();

        let sel = state
            .selections
            .remove(&user)
            .ok_or(SelectionError::NoActiveSelection)?;

        if sel.is_expired(self.config.selection_ttl_ms) {
            tracing::debug!(
                "discarding expired selection for {} in guild {}",
                user,
                self.guild_id
            );
            return Err(SelectionError::NoActiveSelection);
        }

        let count = sel.choices.len();
        if choice < 1 || choice > count {
            state.selections.insert(user, sel);
            return Err(SelectionError::IndexInvalid { count });
        }

        let ctx = TrackContext::new(sel.choices[choice - 1].clone(), user);
        state.queue.push(ctx.clone());
        state.paused = false;
        self.audio.set_pause(&self.guild_id, false);
        if state.current.is_none() {
            self.start_next_locked(&mut state);
        }

        Ok(CommittedSelection {
            context: ctx,
            choice,
            out_msg_id: sel.out_msg_id,
        })
    }

    // ---- playback toggles / destination ----

    pub fn set_pause(&self, paused: bool) {
        let mut state = self.state.write();
        state.paused = paused;
        self.audio.set_pause(&self.guild_id, paused);
    }

    pub fn paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn set_volume(&self, volume: i32) {
        let volume = volume.clamp(0, 150);
        let mut state = self.state.write();
        state.volume = volume;
        self.audio.set_volume(&self.guild_id, volume);
    }

    pub fn volume(&self) -> i32 {
        self.state.read().volume
    }

    pub fn set_active_channel(&self, channel: ChannelId) {
        self.state.write().active_channel = Some(channel);
    }

    pub fn active_channel(&self) -> Option<ChannelId> {
        self.state.read().active_channel
    }

    // ---- teardown ----

    /// Clears all state when the guild goes away. Pending selections are
    /// discarded without resolution.
    pub(crate) fn teardown(&self) {
        let mut state = self.state.write();
        state.selections.clear();
        state.queue.clear();
        state.last_skip = None;
        if let Some(prev) = state.current.take() {
            self.audio.stop(&self.guild_id);
            self.emit(PlayerEvent::track_end(
                self.guild_id.clone(),
                prev,
                TrackEndReason::Cleanup,
            ));
        }
        tracing::info!("session for guild {} torn down", self.guild_id);
    }
}
