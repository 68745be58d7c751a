use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use quill_types::flash::Flash;
use quill_types::views::{FormView, Page};

use crate::cookies::{FLASH_COOKIE_NAME, clear_cookie, redirect_with};

/// Every failure a handler or gate can produce. Each one resolves to a
/// redirect carrying a notice, except store failures which render an error
/// page directly so a failing listing cannot redirect to itself.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("You need to be logged in to do that")]
    LoginRequired { redirect_to: String },

    #[error("Password or username is incorrect")]
    BadCredentials,

    #[error("You don't have permission to do that")]
    Forbidden { back: String },

    #[error("Blog not found")]
    NotFound,

    #[error("{message}")]
    Invalid { message: String, back: String },

    #[error("Something went wrong, please try again")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let notice = Flash::error(self.to_string());
        match self {
            Self::LoginRequired { redirect_to } => redirect_with(notice, &redirect_to),
            Self::BadCredentials => redirect_with(notice, "/login"),
            Self::Forbidden { back } | Self::Invalid { back, .. } => redirect_with(notice, &back),
            Self::NotFound => redirect_with(notice, "/blogs"),
            Self::Store(e) => {
                error!("Store error: {:#}", e);
                let page = Page::new(None, Some(notice), FormView {});
                let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(page)).into_response();
                // Supersedes any pending notice.
                if let Some(cookie) = clear_cookie(FLASH_COOKIE_NAME, false) {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[test]
    fn gate_failures_redirect_with_notice() {
        let response = AppError::LoginRequired {
            redirect_to: "/login".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        assert!(response.headers().contains_key(header::SET_COOKIE));

        let response = AppError::Forbidden {
            back: "/blogs/1".into(),
        }
        .into_response();
        assert_eq!(location(&response), "/blogs/1");

        let response = AppError::NotFound.into_response();
        assert_eq!(location(&response), "/blogs");
    }

    #[test]
    fn store_failure_is_a_rendered_error_not_a_redirect() {
        let response = AppError::from(anyhow::anyhow!("disk full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(header::LOCATION));
    }

    #[test]
    fn store_failure_clears_pending_flash() {
        let response = AppError::from(anyhow::anyhow!("disk full")).into_response();
        let cleared = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("quill_flash=;") && v.contains("Max-Age=0"));
        assert!(cleared);
    }

    #[test]
    fn store_message_hides_the_cause() {
        let err = AppError::from(anyhow::anyhow!("UNIQUE constraint failed: secret"));
        assert_eq!(err.to_string(), "Something went wrong, please try again");
    }
}
