/// Database row types. These map directly to SQLite rows.
/// Distinct from quill-types models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub body: String,
    pub author_id: String,
    pub author_username: String,
    pub created_at: String,
}

/// Column values for inserting a post. The author fields are written once
/// and never touched by updates.
pub struct NewPost<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub image: Option<&'a str>,
    pub body: &'a str,
    pub author_id: &'a str,
    pub author_username: &'a str,
}
