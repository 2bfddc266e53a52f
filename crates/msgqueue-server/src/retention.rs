//! Periodic retention purge.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{QueueError, Result};
use crate::messages::MessageStore;

/// Run one purge pass, logging the outcome.
pub async fn run_once(store: &MessageStore, max_age_days: i64) -> Result<u64> {
    let removed = store.delete_older_than(max_age_days).await?;
    if removed > 0 {
        let remaining = store.count().await?;
        info!(removed, remaining, "Retention purge completed");
    }
    Ok(removed)
}

/// Spawn a task that purges messages older than `max_age_days` every `interval`.
///
/// The first run happens one full interval after startup. A zero interval is
/// rejected before anything is spawned.
pub fn spawn(
    store: MessageStore,
    max_age_days: i64,
    interval: Duration,
) -> Result<JoinHandle<()>> {
    if interval.is_zero() {
        return Err(QueueError::validation("Invalid retention interval"));
    }
    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // Skip first immediate tick
        loop {
            ticker.tick().await;
            if let Err(e) = run_once(&store, max_age_days).await {
                warn!(error = %e, "Retention purge failed");
            }
        }
    }))
}
