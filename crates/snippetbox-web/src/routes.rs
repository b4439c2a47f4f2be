use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, timeout::TimeoutLayer};

use crate::handlers::{account, health, not_found, pages, snippets, users};
use crate::middleware::{
    authenticate, csrf_protect, handle_panic, load_and_save, log_request,
    require_authentication, secure_headers,
};
use crate::state::AppState;

/// Build the application router.
///
/// Page routes run inside the session, CSRF and authentication chain; `/ping` and
/// `/static` do not. Every response passes panic recovery, request logging, security
/// headers and the request timeout.
pub fn build_router(state: AppState, static_dir: &str, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippets::create).post(snippets::create_post),
        )
        .route("/account/view", get(account::view))
        .route(
            "/account/password/update",
            get(account::password_update).post(account::password_update_post),
        )
        .route("/user/logout", post(users::logout_post))
        .route_layer(from_fn(require_authentication));

    let dynamic = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/snippet/view/{id}", get(snippets::view))
        .route("/user/signup", get(users::signup).post(users::signup_post))
        .route("/user/login", get(users::login).post(users::login_post))
        .merge(protected)
        // Last added runs first: session, then CSRF, then auth state.
        .route_layer(from_fn_with_state(state.users.clone(), authenticate))
        .route_layer(from_fn(csrf_protect))
        .route_layer(from_fn_with_state(state.sessions.clone(), load_and_save));

    Router::new()
        .merge(dynamic)
        .route("/ping", get(health::ping))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(from_fn(secure_headers))
        .layer(from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
}
