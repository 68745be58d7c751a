use std::sync::Arc;

use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use quill_db::Database;
use quill_types::models::User;

use crate::rows::user_from_row;
use crate::state::blocking;

pub enum Registration {
    Created(User),
    UsernameTaken,
}

/// Create an identity with an Argon2id password hash.
pub async fn register(db: &Arc<Database>, username: String, password: String) -> Result<Registration> {
    blocking(db, move |db| {
        // Skip hashing when the name is obviously taken; the UNIQUE
        // constraint still catches the race.
        if db.get_user_by_username(&username)?.is_some() {
            return Ok(Registration::UsernameTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?
            .to_string();

        let id = Uuid::new_v4();
        if !db.create_user(&id.to_string(), &username, &password_hash)? {
            return Ok(Registration::UsernameTaken);
        }
        Ok(Registration::Created(User { id, username }))
    })
    .await
}

/// `Ok(None)` for an unknown user or a wrong password.
pub async fn verify(db: &Arc<Database>, username: String, password: String) -> Result<Option<User>> {
    blocking(db, move |db| {
        let Some(row) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };

        let parsed_hash =
            PasswordHash::new(&row.password).map_err(|e| anyhow!("corrupt password hash: {}", e))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Ok(None);
        }

        user_from_row(row).map(Some)
    })
    .await
}
