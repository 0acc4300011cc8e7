use std::sync::OnceLock;

use regex::Regex;

use crate::{
    api::outcome::SkipOutcome,
    common::errors::SkipError,
    common::types::{PermissionLevel, UserId},
    player::{context::TrackContext, queue::TrackQueue},
};

/// `n-m`, both 1-based, inclusive. Leading zeroes allowed so pasted queue
/// listing numbers ("02-07") work.
static RANGE_RE: OnceLock<Regex> = OnceLock::new();
/// Platform user mention, e.g. `<@1234>` or `<@!1234>`.
static MENTION_RE: OnceLock<Regex> = OnceLock::new();

fn range_re() -> &'static Regex {
    RANGE_RE.get_or_init(|| Regex::new(r"^(0?\d+)-(0?\d+)$").unwrap())
}

fn mention_re() -> &'static Regex {
    MENTION_RE.get_or_init(|| Regex::new(r"^<@!?(\d+)>$").unwrap())
}

/// Parsed form of a skip request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipArg {
    /// No argument: the currently playing track.
    Current,
    /// 1-based logical position; 1 is the currently playing track.
    Index(usize),
    /// Inclusive 1-based range of logical positions.
    Range(usize, usize),
    /// Every track queued by the mentioned user, wherever it sits.
    User(UserId),
}

/// Recognize the argument forms, first match wins. Bad input is an
/// expected outcome here, never a panic or a parse exception.
pub fn parse_args(args: &[String]) -> Result<SkipArg, SkipError> {
    let arg = match args {
        [] => return Ok(SkipArg::Current),
        [single] => single.trim(),
        _ => return Err(SkipError::UnrecognizedForm(args.join(" "))),
    };

    if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
        return arg
            .parse::<usize>()
            .map(SkipArg::Index)
            .map_err(|_| SkipError::UnrecognizedForm(arg.to_string()));
    }

    if let Some(caps) = range_re().captures(arg) {
        let start = caps[1].parse::<usize>();
        let end = caps[2].parse::<usize>();
        return match (start, end) {
            (Ok(start), Ok(end)) => Ok(SkipArg::Range(start, end)),
            _ => Err(SkipError::UnrecognizedForm(arg.to_string())),
        };
    }

    if let Some(caps) = mention_re().captures(arg) {
        if let Ok(id) = caps[1].parse::<u64>() {
            return Ok(SkipArg::User(UserId(id)));
        }
    }

    Err(SkipError::UnrecognizedForm(arg.to_string()))
}

/// The exact tracks a request resolves to, plus the outcome parameters the
/// dispatcher will render once they are committed. An empty track list is
/// the informational zero-match case of the user form.
#[derive(Debug)]
pub struct ResolvedSkip {
    pub tracks: Vec<TrackContext>,
    pub outcome: SkipOutcome,
}

/// Resolve a parsed request against a point-in-time view of the player.
/// Logical position 1 is the current track when one exists, otherwise the
/// queue head.
pub fn resolve(
    current: Option<&TrackContext>,
    queue: &TrackQueue,
    arg: &SkipArg,
) -> Result<ResolvedSkip, SkipError> {
    let total = usize::from(current.is_some()) + queue.len();
    let logical = |pos0: usize| -> Option<&TrackContext> {
        match current {
            Some(cur) if pos0 == 0 => Some(cur),
            Some(_) => queue.get(pos0 - 1),
            None => queue.get(pos0),
        }
    };

    match *arg {
        SkipArg::Current => {
            let cur = current.ok_or(SkipError::NothingPlaying)?;
            Ok(ResolvedSkip {
                outcome: SkipOutcome::Skipped {
                    position: 1,
                    title: cur.title().to_string(),
                },
                tracks: vec![cur.clone()],
            })
        }
        SkipArg::Index(n) => {
            if n < 1 {
                return Err(SkipError::IndexTooLow);
            }
            if n > total {
                return Err(SkipError::IndexOutOfBounds { given: n, max: total });
            }
            // Position is validated above, so the lookup cannot miss.
            let ctx = match logical(n - 1) {
                Some(ctx) => ctx,
                None => return Err(SkipError::IndexOutOfBounds { given: n, max: total }),
            };
            Ok(ResolvedSkip {
                outcome: SkipOutcome::Skipped {
                    position: n,
                    title: ctx.title().to_string(),
                },
                tracks: vec![ctx.clone()],
            })
        }
        SkipArg::Range(start, end) => {
            if start < 1 {
                return Err(SkipError::IndexTooLow);
            }
            if end < start {
                return Err(SkipError::RangeInvalid);
            }
            if end > total {
                return Err(SkipError::IndexOutOfBounds {
                    given: end,
                    max: total,
                });
            }
            let tracks: Vec<TrackContext> = (start..=end)
                .filter_map(|n| logical(n - 1).cloned())
                .collect();
            Ok(ResolvedSkip {
                outcome: SkipOutcome::SkippedRange {
                    start,
                    end,
                    count: tracks.len(),
                },
                tracks,
            })
        }
        SkipArg::User(user) => {
            let tracks: Vec<TrackContext> = current
                .into_iter()
                .chain(queue.iter())
                .filter(|ctx| ctx.requester == user)
                .cloned()
                .collect();
            let outcome = if tracks.is_empty() {
                SkipOutcome::NoMatches { user }
            } else {
                SkipOutcome::SkippedUser {
                    user,
                    count: tracks.len(),
                }
            };
            Ok(ResolvedSkip { tracks, outcome })
        }
    }
}

/// Ownership gate, applied after resolution and before commit. Elevated
/// invokers pass unconditionally; everyone else must be the sole owner of
/// the resolved set. Never a partial skip.
pub fn check_ownership(
    tracks: &[TrackContext],
    invoker: UserId,
    level: PermissionLevel,
) -> Result<(), SkipError> {
    if level.is_elevated() {
        return Ok(());
    }
    match tracks.iter().find(|ctx| ctx.requester != invoker) {
        Some(foreign) => Err(SkipError::InsufficientPermission {
            owner: foreign.requester,
        }),
        None => Ok(()),
    }
}
