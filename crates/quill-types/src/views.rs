use serde::Serialize;

use crate::flash::{Flash, FlashKind};
use crate::models::{Post, User};

/// Envelope for every rendered view: who is logged in, any pending notice,
/// and the page-specific payload flattened alongside.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub current_user: Option<User>,
    pub success: Option<String>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Page<T> {
    pub fn new(current_user: Option<User>, flash: Option<Flash>, body: T) -> Self {
        let (success, error) = match flash {
            Some(Flash { kind: FlashKind::Success, message }) => (Some(message), None),
            Some(Flash { kind: FlashKind::Error, message }) => (None, Some(message)),
            None => (None, None),
        };
        Self {
            current_user,
            success,
            error,
            body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub blogs: Vec<Post>,
}

/// Used by show and edit.
#[derive(Debug, Serialize)]
pub struct BlogView {
    pub blog: Post,
}

/// Empty form views (new blog, login).
#[derive(Debug, Serialize)]
pub struct FormView {}

#[derive(Debug, Default, Serialize)]
pub struct RegisterView {
    /// Echoed back after a failed attempt so the form can be refilled.
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn page_flattens_body_and_splits_flash() {
        let user = User {
            id: Uuid::nil(),
            username: "alice".into(),
        };
        let page = Page::new(
            Some(user),
            Some(Flash::success("Logged you out!")),
            RegisterView {
                username: Some("bob".into()),
            },
        );
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["current_user"]["username"], "alice");
        assert_eq!(json["success"], "Logged you out!");
        assert!(json["error"].is_null());
        assert_eq!(json["username"], "bob");
    }
}
