use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::game::MAX_PAIR_COUNT;
use crate::session::ReaperConfig;

/// Pair count used by `create_default_game`
pub const DEFAULT_PAIR_COUNT: usize = 10;

/// Runtime configuration assembled by the binary at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_pair_count: usize,
    pub reaper: ReaperConfig,
    /// When set, scores go to PostgreSQL instead of memory
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_pair_count: DEFAULT_PAIR_COUNT,
            reaper: ReaperConfig::default(),
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Reads overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unusable values fall back to the
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let default_pair_count = match positive_or(
            &lookup,
            "CONCENTRATION_DEFAULT_PAIRS",
            defaults.default_pair_count,
        ) {
            count if count > MAX_PAIR_COUNT => {
                warn!(value = count, max = MAX_PAIR_COUNT, "Default pair count too large");
                defaults.default_pair_count
            }
            count => count,
        };
        let reap_interval_secs = positive_or(
            &lookup,
            "CONCENTRATION_REAP_INTERVAL_SECS",
            defaults.reaper.reap_interval.as_secs(),
        );
        let idle_threshold_secs = positive_or(
            &lookup,
            "CONCENTRATION_IDLE_THRESHOLD_SECS",
            defaults.reaper.idle_threshold.as_secs(),
        );

        Self {
            default_pair_count,
            reaper: ReaperConfig {
                reap_interval: Duration::from_secs(reap_interval_secs),
                idle_threshold: Duration::from_secs(idle_threshold_secs),
            },
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
        }
    }
}

fn positive_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            warn!(key = %key, value = %raw, "Ignoring invalid configuration value");
            default
        }
    }
}
