use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::forms::{PostForm, SnippetCreateForm};
use crate::state::AppState;
use crate::templates::Page;

/// Show one snippet - GET /snippet/view/{id}
pub async fn view(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(WebError::NotFound),
    };

    let snippet = state.snippets.get(id).await?;
    let data = ctx.template_data().with_snippet(snippet);
    state.templates.render(Page::View, StatusCode::OK, &data)
}

/// Blank create form - GET /snippet/create
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let data = ctx
        .template_data()
        .with_form(&SnippetCreateForm::blank())?;
    state.templates.render(Page::Create, StatusCode::OK, &data)
}

/// Create a snippet - POST /snippet/create
pub async fn create_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    PostForm(mut form): PostForm<SnippetCreateForm>,
) -> Result<Response, WebError> {
    if !form.validate() {
        let data = ctx.template_data().with_form(&form)?;
        return state
            .templates
            .render(Page::Create, StatusCode::UNPROCESSABLE_ENTITY, &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    info!("Snippet {} created", id);

    ctx.session.put_flash("Snippet successfully created!");
    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}
