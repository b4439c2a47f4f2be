use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::WebError;
use crate::session::SessionManager;

/// Attach the visitor's [`Session`](crate::session::Session) to the request and persist any
/// changes once the handler has produced a response.
pub async fn load_and_save(
    State(sessions): State<Arc<SessionManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = sessions.token_from_headers(request.headers());
    let session = sessions.load(token).await?;
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(cookie) = sessions.commit(&session).await? {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| WebError::Internal(format!("invalid session cookie: {}", e)))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Cookie"));

    Ok(response)
}
