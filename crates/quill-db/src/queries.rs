use crate::Database;
use crate::models::{NewPost, PostRow, UserRow};
use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, Row};

const POST_COLUMNS: &str = "id, title, image, body, author_id, author_username, created_at";

impl Database {
    // -- Users --

    /// Returns `false` when the username is already taken.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Sessions --

    pub fn create_session(&self, token_hash: &str, user_id: &str, ttl_hours: u64) -> Result<()> {
        let ttl_hours = i64::try_from(ttl_hours).context("session ttl out of range")?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (token_hash, user_id, expires_at)
                 VALUES (?1, ?2, datetime('now', '+' || ?3 || ' hours'))",
                rusqlite::params![token_hash, user_id, ttl_hours],
            )?;
            Ok(())
        })
    }

    /// Resolve a live (unexpired) session to its user.
    pub fn get_session_user(&self, token_hash: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT u.id, u.username, u.password, u.created_at
                 FROM sessions s
                 JOIN users u ON s.user_id = u.id
                 WHERE s.token_hash = ?1 AND s.expires_at > datetime('now')",
                [token_hash],
                user_from_row,
            )
            .optional()
        })
    }

    /// Deleting an unknown session is not an error.
    pub fn delete_session(&self, token_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM sessions WHERE token_hash = ?1", [token_hash])?;
            Ok(())
        })
    }

    pub fn delete_expired_sessions(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count =
                conn.execute("DELETE FROM sessions WHERE expires_at <= datetime('now')", [])?;
            Ok(count)
        })
    }

    // -- Posts --

    pub fn insert_post(&self, post: &NewPost<'_>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, title, image, body, author_id, author_username)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    post.id,
                    post.title,
                    post.image,
                    post.body,
                    post.author_id,
                    post.author_username,
                ],
            )?;
            Ok(())
        })
    }

    /// All posts, newest first.
    pub fn list_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                [id],
                post_from_row,
            )
            .optional()
        })
    }

    /// Replace the editable fields. Returns `false` if the post no longer exists.
    pub fn update_post(
        &self,
        id: &str,
        title: &str,
        image: Option<&str>,
        body: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE posts SET title = ?2, image = ?3, body = ?4 WHERE id = ?1",
                rusqlite::params![id, title, image, body],
            )?;
            Ok(changed > 0)
        })
    }

    /// Returns `false` if there was nothing to delete.
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, password, created_at FROM users WHERE {column} = ?1"
    ))?;

    stmt.query_row([value], user_from_row).optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        image: row.get(2)?,
        body: row.get(3)?,
        author_id: row.get(4)?,
        author_username: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
