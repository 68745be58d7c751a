use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, sessions, posts)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- Only the SHA-256 of the session token is stored.
            CREATE TABLE sessions (
                token_hash  TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                expires_at  TEXT NOT NULL
            );

            CREATE INDEX idx_sessions_expires ON sessions(expires_at);

            CREATE TABLE posts (
                id               TEXT PRIMARY KEY,
                title            TEXT NOT NULL,
                image            TEXT,
                body             TEXT NOT NULL,
                author_id        TEXT NOT NULL REFERENCES users(id),
                author_username  TEXT NOT NULL,
                created_at       TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_created ON posts(created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
