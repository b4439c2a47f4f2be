//! Request-side session handling.
//!
//! [`SessionManager`] turns the session cookie into a [`Session`] handle at the start of a
//! request and writes it back (store + `Set-Cookie`) at the end. Handlers only touch the
//! handle; nothing is persisted until the response is on its way out.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use snippetbox_security::csrf::generate_csrf_token;
use snippetbox_security::session::{
    generate_session_token, SessionData, SessionRecord, SessionStore, SessionStoreError,
};
use snippetbox_shared::config::SessionSettings;

use crate::error::WebError;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime: Duration,
    pub secure: bool,
}

impl From<&SessionSettings> for SessionConfig {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            cookie_name: settings.cookie_name.clone(),
            lifetime: Duration::hours(settings.lifetime_hours),
            secure: settings.cookie_secure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unmodified,
    Modified,
}

#[derive(Debug)]
struct SessionInner {
    token: Option<String>,
    /// Token to retire on commit after a renewal.
    previous_token: Option<String>,
    record: SessionRecord,
    lifetime: Duration,
    status: Status,
}

impl SessionInner {
    fn touch(&mut self) {
        self.status = Status::Modified;
    }
}

/// Per-request handle onto the visitor's session data.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    fn new(token: Option<String>, record: SessionRecord, lifetime: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                token,
                previous_token: None,
                record,
                lifetime,
                status: Status::Unmodified,
            })),
        }
    }

    pub fn authenticated_user_id(&self) -> Option<i64> {
        self.inner.lock().record.data.authenticated_user_id
    }

    pub fn put_authenticated_user_id(&self, id: i64) {
        let mut inner = self.inner.lock();
        inner.record.data.authenticated_user_id = Some(id);
        inner.touch();
    }

    pub fn remove_authenticated_user_id(&self) {
        let mut inner = self.inner.lock();
        if inner.record.data.authenticated_user_id.take().is_some() {
            inner.touch();
        }
    }

    pub fn put_flash(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.record.data.flash = Some(message.into());
        inner.touch();
    }

    /// Read-once: the flash is cleared by this call.
    pub fn pop_flash(&self) -> Option<String> {
        let mut inner = self.inner.lock();
        let flash = inner.record.data.flash.take();
        if flash.is_some() {
            inner.touch();
        }
        flash
    }

    pub fn put_redirect_after_login(&self, path: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.record.data.redirect_after_login = Some(path.into());
        inner.touch();
    }

    pub fn pop_redirect_after_login(&self) -> Option<String> {
        let mut inner = self.inner.lock();
        let path = inner.record.data.redirect_after_login.take();
        if path.is_some() {
            inner.touch();
        }
        path
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.inner.lock().record.data.csrf_token.clone()
    }

    /// The session's CSRF token, minting one on first use.
    pub fn ensure_csrf_token(&self) -> String {
        let mut inner = self.inner.lock();
        if let Some(token) = &inner.record.data.csrf_token {
            return token.clone();
        }
        let token = generate_csrf_token();
        inner.record.data.csrf_token = Some(token.clone());
        inner.touch();
        token
    }

    /// Issue a fresh token on commit while keeping the data, and restart the lifetime.
    pub fn renew_token(&self) {
        let mut inner = self.inner.lock();
        if inner.previous_token.is_none() {
            inner.previous_token = inner.token.take();
        } else {
            inner.token = None;
        }
        inner.record.expires_at = Utc::now() + inner.lifetime;
        inner.touch();
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| WebError::Internal("session middleware is not installed".to_string()))
    }
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.config.cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }

    /// Resolve `token` to a session; unknown or expired tokens start a fresh one.
    pub async fn load(&self, token: Option<String>) -> Result<Session, SessionStoreError> {
        let existing = match token {
            Some(token) => self.store.load(&token).await?.map(|record| (token, record)),
            None => None,
        };

        Ok(match existing {
            Some((token, record)) => Session::new(Some(token), record, self.config.lifetime),
            None => Session::new(
                None,
                SessionRecord::new(SessionData::default(), Utc::now() + self.config.lifetime),
                self.config.lifetime,
            ),
        })
    }

    /// Persist whatever the request changed. Returns the `Set-Cookie` value to send, if any.
    pub async fn commit(&self, session: &Session) -> Result<Option<String>, SessionStoreError> {
        let (status, token, previous_token, record) = {
            let inner = session.inner.lock();
            (
                inner.status,
                inner.token.clone(),
                inner.previous_token.clone(),
                inner.record.clone(),
            )
        };

        if status == Status::Unmodified {
            return Ok(None);
        }

        let token = token.unwrap_or_else(generate_session_token);
        match previous_token {
            Some(old) => self.store.rotate(&old, &token, &record).await?,
            None => self.store.save(&token, &record).await?,
        }
        {
            let mut inner = session.inner.lock();
            inner.token = Some(token.clone());
            inner.previous_token = None;
            inner.status = Status::Unmodified;
        }
        Ok(Some(self.session_cookie(&token, record.expires_at)))
    }

    fn session_cookie(&self, token: &str, expires_at: DateTime<Utc>) -> String {
        let max_age = (expires_at - Utc::now()).num_seconds().max(0);
        let mut cookie = format!(
            "{}={}; Path=/; Expires={}; Max-Age={}; HttpOnly; SameSite=Lax",
            self.config.cookie_name,
            token,
            expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
            max_age
        );
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
