//! Server-side sessions.
//!
//! A session is an opaque random token held in the `quill_session` cookie.
//! The store only ever sees the SHA-256 of the token, so a leaked database
//! cannot be replayed as cookies.

use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use quill_db::Database;
use quill_types::models::User;

use crate::cookies::{SESSION_COOKIE_NAME, clear_cookie, set_cookie};
use crate::rows::user_from_row;
use crate::state::blocking;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_hours: u64,
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            cookie_secure: false,
        }
    }
}

/// Who the current request belongs to. Inserted by the session loader for
/// every request; `None` means anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

pub struct SessionManager {
    db: Arc<Database>,
    ttl_hours: u64,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(db: Arc<Database>, config: &SessionConfig) -> Self {
        Self {
            db,
            ttl_hours: config.ttl_hours,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Open a new session for `user_id` and return its raw token.
    pub async fn start(&self, user_id: Uuid) -> Result<String> {
        let token = generate_session_token();
        let token_hash = hash_session_token(&token);
        let ttl_hours = self.ttl_hours;
        blocking(&self.db, move |db| {
            db.create_session(&token_hash, &user_id.to_string(), ttl_hours)
        })
        .await?;
        debug!("Session started for {}", user_id);
        Ok(token)
    }

    /// `None` for unknown or expired tokens.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let token_hash = hash_session_token(token);
        let row = blocking(&self.db, move |db| db.get_session_user(&token_hash)).await?;
        row.map(user_from_row).transpose()
    }

    /// Ending a session that does not exist is not an error.
    pub async fn end(&self, token: &str) -> Result<()> {
        let token_hash = hash_session_token(token);
        blocking(&self.db, move |db| db.delete_session(&token_hash)).await
    }

    pub fn cookie(&self, token: &str) -> Option<HeaderValue> {
        set_cookie(
            SESSION_COOKIE_NAME,
            token,
            Some(self.ttl_hours.saturating_mul(3600)),
            self.cookie_secure,
        )
    }

    pub fn clear_cookie(&self) -> Option<HeaderValue> {
        clear_cookie(SESSION_COOKIE_NAME, self.cookie_secure)
    }
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
