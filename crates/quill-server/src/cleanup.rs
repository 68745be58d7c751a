use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use quill_db::Database;

/// Background task that deletes expired sessions.
pub async fn run_session_sweeper(db: Arc<Database>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let db = db.clone();
        match tokio::task::spawn_blocking(move || db.delete_expired_sessions()).await {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Cleanup: removed {} expired sessions", count);
                }
            }
            Ok(Err(e)) => warn!("Cleanup error: {}", e),
            Err(e) => warn!("Cleanup task join error: {}", e),
        }
    }
}
