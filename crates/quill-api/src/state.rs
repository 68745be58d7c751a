use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use quill_db::Database;
use quill_types::models::Post;

use crate::rows::post_from_row;
use crate::sanitize::Sanitizer;
use crate::session::{SessionConfig, SessionManager};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub sessions: SessionManager,
    pub sanitizer: Sanitizer,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, session_config: &SessionConfig) -> Result<AppState> {
        Ok(Arc::new(Self {
            sessions: SessionManager::new(db.clone(), session_config),
            sanitizer: Sanitizer::new(),
            db,
        }))
    }

    /// Look a post up by its path id. Ids that are not UUIDs simply do not exist.
    pub async fn find_post(&self, id: &str) -> Result<Option<Post>> {
        let Ok(id) = id.parse::<Uuid>() else {
            return Ok(None);
        };
        let row = blocking(&self.db, move |db| db.get_post(&id.to_string())).await?;
        row.map(post_from_row).transpose()
    }
}

/// Run a store call off the async runtime.
pub async fn blocking<F, T>(db: &Arc<Database>, f: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .context("spawn_blocking join error")?
}
