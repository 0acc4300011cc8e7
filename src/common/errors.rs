use thiserror::Error;

use crate::common::types::UserId;

/// Failures the skip resolver reports back to the dispatcher. All of these
/// are expected outcomes of user input, not faults; none crosses a session
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipError {
    #[error("nothing is playing right now")]
    NothingPlaying,

    #[error("the track number must be 1 or higher")]
    IndexTooLow,

    /// Carries the valid upper bound so the reply can state it.
    #[error("track {given} does not exist, the player holds {max} track(s)")]
    IndexOutOfBounds { given: usize, max: usize },

    #[error("the end of the range must not come before its start")]
    RangeInvalid,

    #[error("could not make sense of `{0}`")]
    UnrecognizedForm(String),

    /// Non-elevated invoker targeted tracks they do not own. The whole
    /// request is denied, never partially applied.
    #[error("only a DJ may skip tracks queued by {owner}")]
    InsufficientPermission { owner: UserId },
}

/// Failures of a numeric selection commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Carries the valid choice count for the reply.
    #[error("pick a number between 1 and {count}")]
    IndexInvalid { count: usize },

    #[error("there is no pending selection to pick from")]
    NoActiveSelection,
}

/// Misuse of the raw queue-snapshot interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("invalid snapshot range {start}..{end} over {len} queued track(s)")]
    Range {
        start: usize,
        end: usize,
        len: usize,
    },
}
