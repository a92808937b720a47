use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, instrument};

use super::registry::RoomRegistry;

/// Configuration for the cleanup task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    /// How often to run the cleanup task
    pub cleanup_interval: Duration,
    /// How long an empty room must be inactive before deletion
    pub inactivity_threshold: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(30 * 60), // 30 minutes
            inactivity_threshold: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

/// Starts the background cleanup task that periodically removes empty, inactive rooms
#[instrument(skip(registry))]
pub async fn start_cleanup_task(registry: Arc<RoomRegistry>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        inactivity_threshold_secs = config.inactivity_threshold.as_secs(),
        "Starting room cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;
        let deleted = cleanup_inactive_rooms(&registry, config.inactivity_threshold).await;
        info!(deleted_count = deleted, "Room cleanup completed");
    }
}

/// Runs one cleanup pass and returns how many rooms were removed
pub async fn cleanup_inactive_rooms(registry: &RoomRegistry, inactivity_threshold: Duration) -> usize {
    let threshold =
        chrono::Duration::from_std(inactivity_threshold).unwrap_or(chrono::Duration::MAX);
    let reaped = registry.reap_idle_rooms(threshold).await;

    for room_id in &reaped {
        info!(room_id = %room_id, "Deleted inactive room");
    }
    reaped.len()
}
