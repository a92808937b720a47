use std::time::Duration;

use crate::game::DEFAULT_MAX_DEAL_ATTEMPTS;
use crate::room::CleanupConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_deal_attempts: usize,
    /// Room reaping; `None` keeps every room for the life of the process
    pub cleanup: Option<CleanupConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_deal_attempts: DEFAULT_MAX_DEAL_ATTEMPTS,
            cleanup: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("CARDROOM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_deal_attempts = lookup("CARDROOM_MAX_DEAL_ATTEMPTS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_DEAL_ATTEMPTS);

        // Reaping is opt-in: only enabled when an idle timeout is given
        let cleanup = lookup("CARDROOM_ROOM_IDLE_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(|idle_secs| {
                let defaults = CleanupConfig::default();
                let cleanup_interval = lookup("CARDROOM_CLEANUP_INTERVAL_SECS")
                    .and_then(|s| s.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.cleanup_interval);
                CleanupConfig {
                    cleanup_interval,
                    inactivity_threshold: Duration::from_secs(idle_secs),
                }
            });

        Self {
            bind_addr,
            max_deal_attempts,
            cleanup,
        }
    }
}
