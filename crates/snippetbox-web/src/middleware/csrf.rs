//! Synchronizer-token CSRF check for state-changing requests.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use snippetbox_security::csrf::{validate_csrf_token, CSRF_FORM_FIELD, CSRF_HEADER_NAME};

use crate::context::CsrfToken;
use crate::error::WebError;
use crate::session::Session;

/// Largest form body buffered while looking for the token.
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

fn is_unsafe(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn token_from_form(body: &[u8]) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value)
}

pub async fn csrf_protect(session: Session, request: Request, next: Next) -> Response {
    let expected = session.ensure_csrf_token();

    let request = if is_unsafe(request.method()) {
        let (mut parts, body) = request.into_parts();
        let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => return WebError::BadRequest(format!("reading body: {}", e)).into_response(),
        };

        let submitted = parts
            .headers
            .get(CSRF_HEADER_NAME)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| token_from_form(&bytes));

        let valid = submitted
            .as_deref()
            .is_some_and(|token| validate_csrf_token(token, &expected));
        if !valid {
            return WebError::BadRequest(format!(
                "CSRF token missing or incorrect for {} {}",
                parts.method, parts.uri
            ))
            .into_response();
        }

        parts.extensions.insert(CsrfToken(expected));
        Request::from_parts(parts, Body::from(bytes))
    } else {
        let mut request = request;
        request.extensions_mut().insert(CsrfToken(expected));
        request
    };

    next.run(request).await
}
