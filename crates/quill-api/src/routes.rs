use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{load_session, method_override, require_auth, require_ownership};
use crate::state::AppState;
use crate::{auth, blogs};

/// All application routes with their gates attached.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(blogs::root))
        .route("/blogs", get(blogs::index))
        .route("/blogs/{id}", get(blogs::show))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout));

    let authenticated_routes = Router::new()
        .route("/blogs/new", get(blogs::new_form))
        .route("/blogs", post(blogs::create))
        .route_layer(middleware::from_fn(require_auth));

    let owner_routes = Router::new()
        .route("/blogs/{id}/edit", get(blogs::edit_form))
        .route("/blogs/{id}", put(blogs::update).delete(blogs::destroy))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_ownership));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(owner_routes)
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .with_state(state)
}

/// The full HTTP surface: routes, static assets under `/public`, request
/// tracing, and method override applied ahead of routing.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let routes = router(state)
        .nest_service("/public", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http());

    Router::new().fallback_service(middleware::from_fn(method_override).layer(routes))
}
