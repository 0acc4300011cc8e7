use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlayerConfig {
    /// Fixed window during which repeated skip invocations for the same
    /// guild are dropped without reply.
    #[serde(default = "default_skip_cooldown_ms")]
    pub skip_cooldown_ms: u64,
    /// How long an unanswered search selection stays committable.
    #[serde(default = "default_selection_ttl_ms")]
    pub selection_ttl_ms: u64,
    #[serde(default = "default_volume")]
    pub volume: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_cooldown_ms: default_skip_cooldown_ms(),
            selection_ttl_ms: default_selection_ttl_ms(),
            volume: default_volume(),
        }
    }
}

fn default_skip_cooldown_ms() -> u64 {
    500
}

fn default_selection_ttl_ms() -> u64 {
    60_000
}

fn default_volume() -> i32 {
    100
}
