use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use quill_db::models::NewPost;
use quill_types::api::BlogForm;
use quill_types::flash::Flash;
use quill_types::models::{Post, User};
use quill_types::views::{BlogView, FormView, IndexView};

use crate::cookies::redirect_with;
use crate::error::AppError;
use crate::form::ValidForm;
use crate::rows::post_from_row;
use crate::state::{AppState, blocking};
use crate::view::Viewer;

pub async fn root() -> impl IntoResponse {
    Redirect::to("/blogs")
}

/// GET /blogs: every post, newest first.
pub async fn index(State(state): State<AppState>, viewer: Viewer) -> Result<Response, AppError> {
    let rows = blocking(&state.db, |db| db.list_posts()).await?;
    let blogs = rows
        .into_iter()
        .map(post_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(viewer.render(IndexView { blogs }))
}

/// GET /blogs/new, behind `require_auth`.
pub async fn new_form(viewer: Viewer) -> Response {
    viewer.render(FormView {})
}

/// POST /blogs, behind `require_auth`. The caller becomes the permanent author.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidForm(form): ValidForm<BlogForm>,
) -> Result<Response, AppError> {
    let id = Uuid::new_v4();
    let pid = id.to_string();
    let aid = user.id.to_string();
    let author_username = user.username.clone();
    let body = state.sanitizer.clean(&form.body);
    blocking(&state.db, move |db| {
        db.insert_post(&NewPost {
            id: &pid,
            title: &form.title,
            image: form.image.as_deref(),
            body: &body,
            author_id: &aid,
            author_username: &author_username,
        })
    })
    .await?;

    info!("{} created post {}", user.username, id);
    Ok(redirect_with(Flash::success("Successfully added Blog"), "/blogs"))
}

/// GET /blogs/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    let blog = state.find_post(&id).await?.ok_or(AppError::NotFound)?;
    Ok(viewer.render(BlogView { blog }))
}

/// GET /blogs/{id}/edit, behind `require_ownership`, which already loaded the post.
pub async fn edit_form(Extension(blog): Extension<Post>, viewer: Viewer) -> Response {
    viewer.render(BlogView { blog })
}

/// PUT /blogs/{id}, behind `require_ownership`. Author fields are never touched.
pub async fn update(
    State(state): State<AppState>,
    Extension(post): Extension<Post>,
    ValidForm(form): ValidForm<BlogForm>,
) -> Result<Response, AppError> {
    let pid = post.id.to_string();
    let body = state.sanitizer.clean(&form.body);
    let updated = blocking(&state.db, move |db| {
        db.update_post(&pid, &form.title, form.image.as_deref(), &body)
    })
    .await?;

    if !updated {
        // Deleted between the ownership check and the write.
        warn!("Post {} vanished before update", post.id);
        return Err(AppError::NotFound);
    }

    info!("Updated post {}", post.id);
    Ok(redirect_with(
        Flash::success("Successfully Updated Blog"),
        &format!("/blogs/{}", post.id),
    ))
}

/// DELETE /blogs/{id}, behind `require_ownership`.
pub async fn destroy(
    State(state): State<AppState>,
    Extension(post): Extension<Post>,
) -> Result<Response, AppError> {
    let pid = post.id.to_string();
    let deleted = blocking(&state.db, move |db| db.delete_post(&pid)).await?;

    if !deleted {
        warn!("Post {} vanished before delete", post.id);
        return Err(AppError::NotFound);
    }

    info!("Deleted post {}", post.id);
    Ok(redirect_with(Flash::success("Successfully Deleted Blog"), "/blogs"))
}
