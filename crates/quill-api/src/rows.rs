use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

use quill_db::models::{PostRow, UserRow};
use quill_types::models::{Author, Post, User};

pub fn user_from_row(row: UserRow) -> Result<User> {
    Ok(User {
        id: row.id.parse().with_context(|| format!("corrupt user id '{}'", row.id))?,
        username: row.username,
    })
}

pub fn post_from_row(row: PostRow) -> Result<Post> {
    let id = row.id.parse().with_context(|| format!("corrupt post id '{}'", row.id))?;
    let author_id = row
        .author_id
        .parse()
        .with_context(|| format!("corrupt author_id '{}' on post '{}'", row.author_id, row.id))?;
    let created_at = parse_timestamp(&row.created_at)
        .with_context(|| format!("corrupt created_at '{}' on post '{}'", row.created_at, row.id))?;

    Ok(Post {
        id,
        title: row.title,
        image: row.image,
        body: row.body,
        author: Author {
            id: author_id,
            username: row.author_username,
        },
        created_at,
    })
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")?;
    Ok(naive.and_utc())
}
