//! Per-request values derived by middleware and handed to handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Datelike, Utc};

use crate::error::WebError;
use crate::session::Session;
use crate::templates::TemplateData;

/// Whether the request belongs to a signed-in user that still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticated(i64),
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            AuthStatus::Authenticated(id) => Some(*id),
            AuthStatus::Anonymous => None,
        }
    }
}

/// The CSRF token pages must embed in their forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

/// Everything a page handler needs besides its own inputs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session: Session,
    pub auth: AuthStatus,
    pub csrf_token: String,
}

impl RequestContext {
    /// Base template data for this request. Consumes any pending flash message.
    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            current_year: Utc::now().year(),
            flash: self.session.pop_flash(),
            is_authenticated: self.auth.is_authenticated(),
            csrf_token: self.csrf_token.clone(),
            ..TemplateData::default()
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let auth = parts.extensions.get::<AuthStatus>().copied().unwrap_or_default();
        let csrf_token = match parts.extensions.get::<CsrfToken>() {
            Some(CsrfToken(token)) => token.clone(),
            None => session.ensure_csrf_token(),
        };

        Ok(Self {
            session,
            auth,
            csrf_token,
        })
    }
}
