//! Handlebars template cache and the data every page is rendered with.
//!
//! Templates are compiled into the binary and registered once at startup. Each page fills
//! the `title` and `main` inline partials of the shared `base` layout.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;

use snippetbox_core::{Snippet, User};
use snippetbox_shared::AppError;

use crate::error::WebError;

const PARTIALS: &[(&str, &str)] = &[
    ("base", include_str!("../../../ui/html/base.hbs")),
    ("nav", include_str!("../../../ui/html/partials/nav.hbs")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    View,
    Create,
    Signup,
    Login,
    About,
    Account,
    Password,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::View,
        Page::Create,
        Page::Signup,
        Page::Login,
        Page::About,
        Page::Account,
        Page::Password,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::View => "view",
            Page::Create => "create",
            Page::Signup => "signup",
            Page::Login => "login",
            Page::About => "about",
            Page::Account => "account",
            Page::Password => "password",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Page::Home => include_str!("../../../ui/html/pages/home.hbs"),
            Page::View => include_str!("../../../ui/html/pages/view.hbs"),
            Page::Create => include_str!("../../../ui/html/pages/create.hbs"),
            Page::Signup => include_str!("../../../ui/html/pages/signup.hbs"),
            Page::Login => include_str!("../../../ui/html/pages/login.hbs"),
            Page::About => include_str!("../../../ui/html/pages/about.hbs"),
            Page::Account => include_str!("../../../ui/html/pages/account.hbs"),
            Page::Password => include_str!("../../../ui/html/pages/password.hbs"),
        }
    }
}

/// Values shared by every page plus the page-specific payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub user: Option<User>,
    pub form: serde_json::Value,
}

impl TemplateData {
    pub fn with_form<F: Serialize>(mut self, form: &F) -> Result<Self, WebError> {
        self.form = serde_json::to_value(form)
            .map_err(|e| WebError::Internal(format!("serializing form: {}", e)))?;
        Ok(self)
    }

    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

/// Formats an RFC 3339 timestamp as `17 Mar 2022 at 10:15` (UTC).
pub fn human_date(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string())
        .unwrap_or_default()
}

handlebars_helper!(human_date_helper: |value: str| human_date(value));

pub struct TemplateCache {
    registry: Handlebars<'static>,
}

impl TemplateCache {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.register_helper("human_date", Box::new(human_date_helper));

        for (name, source) in PARTIALS {
            registry
                .register_partial(name, *source)
                .map_err(|e| AppError::TemplateError(format!("{}: {}", name, e)))?;
        }

        for page in Page::ALL {
            registry
                .register_template_string(page.name(), page.source())
                .map_err(|e| AppError::TemplateError(format!("{}: {}", page.name(), e)))?;
        }

        Ok(Self { registry })
    }

    pub fn render_to_string(&self, page: Page, data: &TemplateData) -> Result<String, WebError> {
        self.registry
            .render(page.name(), data)
            .map_err(|e| WebError::Internal(format!("rendering {}: {}", page.name(), e)))
    }

    /// Renders fully before anything is written, so a template error still yields a clean 500.
    pub fn render(
        &self,
        page: Page,
        status: StatusCode,
        data: &TemplateData,
    ) -> Result<Response, WebError> {
        let body = self.render_to_string(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_human_date() {
        let tests = [
            ("UTC", "2022-03-17T10:15:00Z", "17 Mar 2022 at 10:15"),
            ("CET", "2022-03-17T10:15:00+01:00", "17 Mar 2022 at 09:15"),
            ("Empty", "", ""),
        ];

        for (name, input, want) in tests {
            assert_eq!(human_date(input), want, "{}", name);
        }
    }

    #[test]
    fn test_all_pages_register_and_render() {
        let cache = TemplateCache::new().unwrap();
        let data = TemplateData {
            current_year: 2024,
            csrf_token: "tok".to_string(),
            ..TemplateData::default()
        };
        for page in [Page::Home, Page::About, Page::Login, Page::Signup] {
            let html = cache.render_to_string(page, &data).unwrap();
            assert!(html.contains("<!doctype html>"), "{}", page.name());
            assert!(html.contains("2024"), "{}", page.name());
        }
    }

    #[test]
    fn test_view_escapes_content() {
        let cache = TemplateCache::new().unwrap();
        let created = Utc.with_ymd_and_hms(2022, 3, 17, 10, 15, 0).unwrap();
        let data = TemplateData::default().with_snippet(Snippet {
            id: 1,
            title: "<script>".to_string(),
            content: "An old silent pond...".to_string(),
            created,
            expires: created,
        });
        let html = cache.render_to_string(Page::View, &data).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("17 Mar 2022 at 10:15"));
    }

    #[test]
    fn test_form_errors_and_hidden_token() {
        let cache = TemplateCache::new().unwrap();
        let mut form = crate::forms::SnippetCreateForm::blank();
        form.validate();
        let data = TemplateData {
            csrf_token: "abc123".to_string(),
            ..TemplateData::default()
        }
        .with_form(&form)
        .unwrap();

        let html = cache.render_to_string(Page::Create, &data).unwrap();
        assert!(html.contains("This field cannot be blank"));
        assert!(html.contains("<input type='hidden' name='csrf_token' value='abc123'>"));
        assert!(html.contains("value='365' checked"));
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_form_serialization_failure_is_internal_error() {
        let err = TemplateData::default().with_form(&Unserializable).unwrap_err();
        assert!(matches!(err, WebError::Internal(ref msg) if msg.contains("not representable")));
    }
}
