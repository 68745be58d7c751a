//! The authorization gate and the request plumbing around it.
//!
//! `load_session` runs for every request and records the caller in a
//! [`CurrentUser`] extension. The two gates then read that extension:
//! `require_auth` for routes that need any logged-in user, and
//! `require_ownership` for routes that act on a specific post. On success
//! both insert the [`User`] (and the owned [`Post`]) as extensions for the
//! handler; on failure the handler never runs.

use anyhow::anyhow;
use axum::{
    extract::{Path, Query, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::{info, warn};

use quill_types::models::{Post, User};

use crate::cookies::{SESSION_COOKIE_NAME, back_location, read_cookie};
use crate::error::AppError;
use crate::session::CurrentUser;
use crate::state::AppState;

/// Resolve the session cookie (if any) into a [`CurrentUser`]. A failed
/// lookup leaves the caller anonymous for public pages and marks the request
/// with [`SessionLookupFailed`] so the gates report a store error.
pub async fn load_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match read_cookie(req.headers(), SESSION_COOKIE_NAME) {
        Some(token) => match state.sessions.resolve(&token).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Session lookup failed: {:#}", e);
                req.extensions_mut().insert(SessionLookupFailed);
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

/// The session cookie could not be checked against the store.
#[derive(Debug, Clone, Copy)]
pub struct SessionLookupFailed;

fn current_user(req: &Request) -> Result<Option<User>, AppError> {
    if req.extensions().get::<SessionLookupFailed>().is_some() {
        return Err(AppError::Store(anyhow!("session lookup failed")));
    }
    Ok(req
        .extensions()
        .get::<CurrentUser>()
        .and_then(|current| current.0.clone()))
}

/// Any logged-in user may pass; anonymous callers are sent to the login page.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?.ok_or_else(|| AppError::LoginRequired {
        redirect_to: "/login".into(),
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Only the author of the post named by the `{id}` path segment may pass.
pub async fn require_ownership(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let back = back_location(req.headers());

    let user = current_user(&req)?.ok_or_else(|| AppError::LoginRequired {
        redirect_to: back.clone(),
    })?;

    let post = state.find_post(&id).await?.ok_or(AppError::NotFound)?;

    if !post.is_owned_by(&user) {
        info!(
            "Denied {} {} to {} (post {} belongs to {})",
            req.method(),
            req.uri().path(),
            user.id,
            post.id,
            post.author.id
        );
        return Err(AppError::Forbidden { back });
    }

    req.extensions_mut().insert(user);
    req.extensions_mut().insert::<Post>(post);
    Ok(next.run(req).await)
}

#[derive(Debug, Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// HTML forms can only POST, so `POST /blogs/{id}?_method=PUT` is treated as
/// `PUT /blogs/{id}`. Must run before routing.
pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() == Method::POST {
        let requested = Query::<MethodOverride>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(query)| query.method)
            .map(|method| method.to_ascii_uppercase());

        match requested.as_deref() {
            Some("PUT") => *req.method_mut() = Method::PUT,
            Some("DELETE") => *req.method_mut() = Method::DELETE,
            _ => {}
        }
    }

    next.run(req).await
}
