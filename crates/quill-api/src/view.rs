use std::convert::Infallible;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use quill_types::flash::Flash;
use quill_types::models::User;
use quill_types::views::Page;

use crate::cookies::{FLASH_COOKIE_NAME, clear_cookie, read_cookie};
use crate::session::CurrentUser;

/// Everything a rendered view needs besides its own payload: the logged-in
/// user and the pending flash notice, if any.
pub struct Viewer {
    pub user: Option<User>,
    pub flash: Option<Flash>,
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .and_then(|current| current.0.clone());
        let flash = read_cookie(&parts.headers, FLASH_COOKIE_NAME).and_then(|raw| Flash::decode(&raw));
        Ok(Self { user, flash })
    }
}

impl Viewer {
    pub fn render<T: Serialize>(self, body: T) -> Response {
        self.render_with_status(StatusCode::OK, body)
    }

    /// Renders the page and consumes the flash notice, so it shows exactly once.
    pub fn render_with_status<T: Serialize>(self, status: StatusCode, body: T) -> Response {
        let had_flash = self.flash.is_some();
        let page = Page::new(self.user, self.flash, body);
        let mut response = (status, Json(page)).into_response();
        if had_flash {
            if let Some(cookie) = clear_cookie(FLASH_COOKIE_NAME, false) {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
        }
        response
    }

    /// Show `notice` on this render, replacing any pending notice.
    pub fn with_error(mut self, notice: impl Into<String>) -> Self {
        self.flash = Some(Flash::error(notice));
        self
    }
}
