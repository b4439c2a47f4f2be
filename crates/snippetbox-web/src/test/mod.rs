//! Shared harness for router-level tests.


use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Duration;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use snippetbox_core::repositories::{SnippetRepository, UserRepository};
use snippetbox_security::MemorySessionStore;

use crate::session::{SessionConfig, SessionManager};
use crate::state::AppState;
use crate::build_router;
use crate::templates::TemplateCache;

pub use fixtures::{FixtureSnippets, FixtureUsers};

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../ui/static");

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn csrf_token(&self) -> String {
        Regex::new(r"name='csrf_token' value='([0-9a-f]+)'")
            .unwrap()
            .captures(&self.body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .expect("page carries a CSRF token")
    }
}

/// Drives the real router and carries cookies between requests like a browser would.
pub struct TestClient {
    router: Router,
    cookies: HashMap<String, String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_repositories(Arc::new(FixtureSnippets), Arc::new(FixtureUsers))
    }

    pub fn with_users(users: Arc<dyn UserRepository>) -> Self {
        Self::with_repositories(Arc::new(FixtureSnippets), users)
    }

    pub fn with_repositories(
        snippets: Arc<dyn SnippetRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self::with_timeout(snippets, users, std::time::Duration::from_secs(10))
    }

    pub fn with_timeout(
        snippets: Arc<dyn SnippetRepository>,
        users: Arc<dyn UserRepository>,
        request_timeout: std::time::Duration,
    ) -> Self {
        let sessions = SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            SessionConfig {
                cookie_name: "session".to_string(),
                lifetime: Duration::hours(12),
                secure: true,
            },
        );
        let state = AppState {
            snippets,
            users,
            templates: Arc::new(TemplateCache::new().unwrap()),
            sessions: Arc::new(sessions),
        };

        Self {
            router: build_router(state, STATIC_DIR, request_timeout),
            cookies: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let jar = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, jar.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let (name, token) = value
                .split(';')
                .next()
                .and_then(|pair| pair.split_once('='))
                .unwrap();
            self.cookies.insert(name.to_string(), token.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Fetch a page for its CSRF token.
    pub async fn csrf_token(&mut self, page: &str) -> String {
        self.get(page).await.csrf_token()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        let token = self.csrf_token("/user/login").await;
        self.post_form(
            "/user/login",
            &[("email", email), ("password", password), ("csrf_token", token.as_str())],
        )
        .await
    }
}
