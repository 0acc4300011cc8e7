use serde::Serialize;

use crate::common::types::UserId;

/// Successful (or informational) result of a skip invocation. The dispatch
/// layer owns rendering and delivery; this only carries the parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkipOutcome {
    /// Nothing queued and nothing playing.
    QueueEmpty,
    /// Invocation landed inside the cooldown window. Must be rendered as
    /// silence; repeated submits would otherwise spam the channel.
    Cooldown,
    /// A single track was skipped.
    #[serde(rename_all = "camelCase")]
    Skipped { position: usize, title: String },
    /// An inclusive 1-based range of tracks was skipped.
    #[serde(rename_all = "camelCase")]
    SkippedRange {
        start: usize,
        end: usize,
        count: usize,
    },
    /// Every track owned by `user` was skipped.
    #[serde(rename_all = "camelCase")]
    SkippedUser { user: UserId, count: usize },
    /// The mentioned user owns no queued tracks. Informational, not a
    /// failure.
    #[serde(rename_all = "camelCase")]
    NoMatches { user: UserId },
}

impl SkipOutcome {
    /// True for outcomes the dispatcher must not surface as a message.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Cooldown)
    }
}

impl std::fmt::Display for SkipOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueueEmpty => write!(f, "The queue is empty"),
            Self::Cooldown => Ok(()),
            Self::Skipped { position, title } => {
                write!(f, "#{} has been skipped: {}", position, title)
            }
            Self::SkippedRange { start, end, count } => {
                // Two-digit positions, matching how queue listings number
                // their rows.
                write!(f, "Tracks {:02}-{:02} ({}) have been skipped", start, end, count)
            }
            Self::SkippedUser { user, count } => {
                write!(f, "{} track(s) queued by {} have been skipped", count, user)
            }
            Self::NoMatches { user } => {
                write!(f, "{} has no tracks in the queue", user)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_tagged() {
        let outcome = SkipOutcome::SkippedRange {
            start: 2,
            end: 3,
            count: 2,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "skippedRange");
        assert_eq!(json["start"], 2);
        assert_eq!(json["end"], 3);
        assert_eq!(json["count"], 2);
    }

    #[test]
    fn test_range_renders_two_digit_positions() {
        let outcome = SkipOutcome::SkippedRange {
            start: 2,
            end: 11,
            count: 10,
        };
        assert_eq!(
            outcome.to_string(),
            "Tracks 02-11 (10) have been skipped"
        );
    }

    #[test]
    fn test_cooldown_is_the_only_silent_outcome() {
        assert!(SkipOutcome::Cooldown.is_silent());
        assert!(!SkipOutcome::QueueEmpty.is_silent());
        assert_eq!(SkipOutcome::Cooldown.to_string(), "");
    }
}
