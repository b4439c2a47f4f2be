use axum::{extract::State, http::StatusCode, response::Response};

use crate::context::RequestContext;
use crate::error::WebError;
use crate::state::AppState;
use crate::templates::Page;

/// Home page - GET /
pub async fn home(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let snippets = state.snippets.latest().await?;
    let data = ctx.template_data().with_snippets(snippets);
    state.templates.render(Page::Home, StatusCode::OK, &data)
}

/// About page - GET /about
pub async fn about(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    state
        .templates
        .render(Page::About, StatusCode::OK, &ctx.template_data())
}
