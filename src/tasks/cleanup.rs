//! TTL Expiry Task
//!
//! Background task that periodically removes expired keys from the memory store.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Sweep period for `interval_secs`, never shorter than one second.
fn sweep_interval(interval_secs: u64) -> Duration {
    Duration::from_secs(interval_secs.max(1))
}

/// Spawns a background task that sweeps expired keys out of `store`.
///
/// Lookups already ignore expired keys; the sweep only bounds memory held by
/// keys nobody reads again.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_expiry_task(store: MemoryStore, interval_secs: u64) -> JoinHandle<()> {
    let interval = sweep_interval(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL expiry task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;

            if removed > 0 {
                info!("TTL expiry: removed {} expired keys", removed);
            } else {
                debug!("TTL expiry: no expired keys found");
            }
        }
    })
}
