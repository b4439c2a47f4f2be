use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

use snippetbox_core::repositories::UserRepository;

use crate::context::AuthStatus;
use crate::error::WebError;
use crate::session::Session;

/// Resolve the session's user id into an [`AuthStatus`] for the rest of the chain.
pub async fn authenticate(
    State(users): State<Arc<dyn UserRepository>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let status = match session.authenticated_user_id() {
        None => AuthStatus::Anonymous,
        Some(id) => {
            if users.exists(id).await? {
                AuthStatus::Authenticated(id)
            } else {
                debug!("Session refers to missing user {}", id);
                AuthStatus::Anonymous
            }
        }
    };

    request.extensions_mut().insert(status);
    Ok(next.run(request).await)
}

/// Guard for routes that need a signed-in user.
pub async fn require_authentication(session: Session, request: Request, next: Next) -> Response {
    let status = request
        .extensions()
        .get::<AuthStatus>()
        .copied()
        .unwrap_or_default();

    if !status.is_authenticated() {
        // Only a GET can be replayed by the post-login redirect.
        if *request.method() == Method::GET {
            let wanted = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| request.uri().path().to_string());
            session.put_redirect_after_login(wanted);
        }
        info!("Anonymous request to {} redirected to login", request.uri().path());
        return Redirect::to("/user/login").into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
