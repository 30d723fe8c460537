//! Background scheduler for periodic dataset refresh.

use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts the dataset refresh loop.
///
/// The first run happens one `period` after startup, since building the state
/// already refreshed once.
pub fn start_dataset_refresh_scheduler(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        info!(
            "Dataset refresh scheduler started ({}s interval)",
            period.as_secs()
        );

        let mut refresh_interval = interval_at(Instant::now() + period, period);

        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    });
}

/// Runs a single scheduled refresh. Failures keep the previous dataset serving.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    info!("Running scheduled dataset refresh...");
    match state.dataset_cache.refresh().await {
        Ok(()) => {
            let status = state.dataset_cache.status();
            info!(
                "Scheduled dataset refresh completed: {} series",
                status.series_count
            );
        }
        Err(e) => warn!("Scheduled dataset refresh failed: {}", e),
    }
}
