//! Session configuration.

use std::time::Duration;

/// Tunables for a session's lifecycle.
///
/// The defaults match a real deployment; tests shrink the windows to
/// milliseconds (or pause the clock) to keep themselves fast.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Minimum roster size to start. Matches the smallest role pool.
    pub min_players: usize,

    /// Maximum roster size. Must not exceed the largest role pool.
    pub max_players: usize,

    /// How long a Night window stays open for secret actions.
    pub night_window: Duration,

    /// How long a Day window stays open for votes.
    pub day_window: Duration,

    /// How long an ended session keeps answering snapshot reads (with
    /// roles revealed) before its actor exits.
    pub ended_linger: Duration,

    /// How long a session may sit without any accepted activity before
    /// the watchdog ends it.
    pub idle_after: Duration,

    /// How often the watchdog sweeps the registry.
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_players: nocturne_rules::MIN_PLAYERS,
            max_players: nocturne_rules::MAX_PLAYERS,
            night_window: Duration::from_secs(30),
            day_window: Duration::from_secs(60),
            ended_linger: Duration::from_secs(30),
            idle_after: Duration::from_secs(60 * 60 * 48),
            sweep_interval: Duration::from_secs(60 * 30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_match_role_pool_bounds() {
        let config = SessionConfig::default();
        assert_eq!(config.min_players, 5);
        assert_eq!(config.max_players, 10);
    }

    #[test]
    fn test_default_windows_are_ordered_sensibly() {
        let config = SessionConfig::default();
        assert!(config.night_window < config.idle_after);
        assert!(config.sweep_interval < config.idle_after);
    }
}
