//! Tick loop configuration.

use std::time::Duration;

/// Configuration for a session's tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Ticks per logged timing summary (0 = never).
    pub stats_window: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 10.0,
            max_ticks: 0,
            stats_window: 30,
        }
    }
}

impl TickConfig {
    /// Returns `true` if the tick rate is a finite positive number whose
    /// period fits in a [`Duration`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tick_rate.is_finite() && self.tick_rate > 0.0 && self.try_period().is_some()
    }

    /// Time between ticks, or `None` if the rate has no representable
    /// period.
    #[must_use]
    pub fn try_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.tick_rate).ok()
    }

    /// Time between ticks. An invalid rate saturates to [`Duration::MAX`].
    #[must_use]
    pub fn period(&self) -> Duration {
        self.try_period().unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ten_hertz() {
        let config = TickConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.period(), Duration::from_millis(100));
        assert_eq!(config.stats_window, 30);
        assert_eq!(config.max_ticks, 0);
    }

    #[test]
    fn test_rejects_bad_rates() {
        for tick_rate in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-20] {
            let config = TickConfig {
                tick_rate,
                ..TickConfig::default()
            };
            assert!(!config.is_valid(), "{tick_rate}");
        }
    }

    #[test]
    fn test_unrepresentable_period_does_not_panic() {
        let config = TickConfig {
            tick_rate: 1e-20,
            ..TickConfig::default()
        };
        assert!(config.try_period().is_none());
        assert_eq!(config.period(), Duration::MAX);
    }

    #[test]
    fn test_slow_but_representable_rate_is_valid() {
        let config = TickConfig {
            tick_rate: 0.5,
            ..TickConfig::default()
        };
        assert!(config.is_valid());
        assert_eq!(config.period(), Duration::from_secs(2));
    }
}
