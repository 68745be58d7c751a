use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use tracing::{error, info, warn};

use quill_types::api::{LoginForm, RegisterForm, Validate};
use quill_types::flash::Flash;
use quill_types::models::User;
use quill_types::views::{FormView, RegisterView};

use crate::cookies::{SESSION_COOKIE_NAME, read_cookie, redirect_with};
use crate::credentials::{self, Registration};
use crate::error::AppError;
use crate::state::AppState;
use crate::view::Viewer;

pub async fn register_form(viewer: Viewer) -> Response {
    viewer.render(RegisterView::default())
}

/// Failed registrations re-render the form with the reason instead of
/// redirecting, so the caller stays on the page they were filling in.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    viewer: Viewer,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return Ok(viewer
                .with_error(rejection.body_text())
                .render_with_status(StatusCode::UNPROCESSABLE_ENTITY, RegisterView::default()));
        }
    };

    let attempted = RegisterView {
        username: Some(form.username.trim().to_string()),
    };

    let form = match form.validate() {
        Ok(form) => form,
        Err(message) => {
            return Ok(viewer
                .with_error(message)
                .render_with_status(StatusCode::UNPROCESSABLE_ENTITY, attempted));
        }
    };

    match credentials::register(&state.db, form.username, form.password).await {
        Ok(Registration::Created(user)) => {
            info!("Registered {} ({})", user.username, user.id);
            let notice = Flash::success(format!(
                "Successfully Signed Up! Nice to meet you {}",
                user.username
            ));
            begin_session(&state, &headers, &user, notice).await
        }
        Ok(Registration::UsernameTaken) => Ok(viewer
            .with_error("A user with the given username is already registered")
            .render_with_status(StatusCode::CONFLICT, attempted)),
        Err(e) => {
            error!("Registration failed: {:#}", e);
            Ok(viewer
                .with_error(AppError::Store(e).to_string())
                .render_with_status(StatusCode::INTERNAL_SERVER_ERROR, attempted))
        }
    }
}

pub async fn login_form(viewer: Viewer) -> Response {
    viewer.render(FormView {})
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Ok(Form(form)) = form else {
        return Err(AppError::BadCredentials);
    };
    let form = form.validate().map_err(|_| AppError::BadCredentials)?;

    let Some(user) = credentials::verify(&state.db, form.username, form.password).await? else {
        info!("Failed login attempt");
        return Err(AppError::BadCredentials);
    };

    info!("{} logged in", user.username);
    let notice = Flash::success(format!("Welcome to Blog, {}!", user.username));
    begin_session(&state, &headers, &user, notice).await
}

/// Always succeeds, whether or not there was a session to end.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = read_cookie(&headers, SESSION_COOKIE_NAME) {
        if let Err(e) = state.sessions.end(&token).await {
            warn!("Failed to delete session on logout: {:#}", e);
        }
    }

    let mut response = redirect_with(Flash::success("Logged you out!"), "/blogs");
    if let Some(cookie) = state.sessions.clear_cookie() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Replace any existing session with a fresh one for `user` and send them
/// to the listing.
async fn begin_session(
    state: &AppState,
    headers: &HeaderMap,
    user: &User,
    notice: Flash,
) -> Result<Response, AppError> {
    if let Some(previous) = read_cookie(headers, SESSION_COOKIE_NAME) {
        state.sessions.end(&previous).await?;
    }

    let token = state.sessions.start(user.id).await?;

    let mut response = redirect_with(notice, "/blogs");
    if let Some(cookie) = state.sessions.cookie(&token) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
