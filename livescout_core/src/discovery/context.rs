//! Upstream block/backoff state carried between runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Whether the upstream is currently refusing us.
///
/// Owned by the caller and passed to each run. A run where every query was
/// blocked arms a cooldown; any successful query clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamState {
    /// Runs in a row where every query was blocked
    pub consecutive_blocked_runs: u32,

    /// No upstream requests until this instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_until: Option<DateTime<Utc>>,
}

impl UpstreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cooling_down(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Seconds left on the cooldown, 0 when not cooling down.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        self.cooldown_until
            .map(|until| (until - now).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    pub fn record_block(&mut self, now: DateTime<Utc>, cooldown_secs: u64) {
        self.consecutive_blocked_runs = self.consecutive_blocked_runs.saturating_add(1);
        let secs = cooldown_secs.min(u64::from(u32::MAX)) as i64;
        self.cooldown_until = now.checked_add_signed(Duration::seconds(secs));
    }

    pub fn reset(&mut self) {
        self.consecutive_blocked_runs = 0;
        self.cooldown_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_arms_cooldown() {
        let now = Utc::now();
        let mut state = UpstreamState::new();
        assert!(!state.is_cooling_down(now));

        state.record_block(now, 300);
        assert!(state.is_cooling_down(now));
        assert!(state.is_cooling_down(now + Duration::seconds(299)));
        assert!(!state.is_cooling_down(now + Duration::seconds(300)));
        assert_eq!(state.remaining_secs(now), 300);
        assert_eq!(state.consecutive_blocked_runs, 1);
    }

    #[test]
    fn test_reset_clears() {
        let now = Utc::now();
        let mut state = UpstreamState::new();
        state.record_block(now, 60);
        state.record_block(now, 60);
        assert_eq!(state.consecutive_blocked_runs, 2);

        state.reset();
        assert_eq!(state, UpstreamState::default());
        assert_eq!(state.remaining_secs(now), 0);
    }
}
