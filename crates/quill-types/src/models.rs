use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity attached to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// Author reference stored on a post.
///
/// `username` is a snapshot taken when the post was created and is never
/// refreshed; ownership is decided by `id` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub body: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.author.id == user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_compares_ids_not_usernames() {
        let author = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
        };
        let post = Post {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            image: None,
            body: "World".into(),
            author: Author {
                id: author.id,
                username: "alice-old-name".into(),
            },
            created_at: Utc::now(),
        };

        assert!(post.is_owned_by(&author));

        let impostor = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
        };
        assert!(!post.is_owned_by(&impostor));
    }
}
