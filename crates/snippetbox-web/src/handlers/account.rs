use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use snippetbox_core::DomainError;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::forms::{AccountPasswordUpdateForm, PostForm, BAD_CURRENT_PASSWORD};
use crate::state::AppState;
use crate::templates::Page;

fn login_redirect() -> Response {
    Redirect::to("/user/login").into_response()
}

/// Profile - GET /account/view
pub async fn view(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let Some(id) = ctx.auth.user_id() else {
        return Ok(login_redirect());
    };

    let user = match state.users.get(id).await {
        Ok(user) => user,
        Err(DomainError::NotFound) => return Ok(login_redirect()),
        Err(e) => return Err(e.into()),
    };

    let data = ctx.template_data().with_user(user);
    state.templates.render(Page::Account, StatusCode::OK, &data)
}

/// Change-password form - GET /account/password/update
pub async fn password_update(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let data = ctx
        .template_data()
        .with_form(&AccountPasswordUpdateForm::default())?;
    state.templates.render(Page::Password, StatusCode::OK, &data)
}

/// Change password - POST /account/password/update
pub async fn password_update_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    PostForm(mut form): PostForm<AccountPasswordUpdateForm>,
) -> Result<Response, WebError> {
    let Some(id) = ctx.auth.user_id() else {
        return Ok(login_redirect());
    };

    if form.validate() {
        match state
            .users
            .password_update(id, &form.current_password, &form.new_password)
            .await
        {
            Ok(()) => {
                ctx.session.renew_token();
                ctx.session.put_flash("Your password has been updated!");
                info!("User {} changed their password", id);
                return Ok(Redirect::to("/account/view").into_response());
            }
            Err(DomainError::InvalidCredentials) => {
                form.validator
                    .add_field_error("current_password", BAD_CURRENT_PASSWORD);
            }
            Err(DomainError::NotFound) => return Ok(login_redirect()),
            Err(e) => return Err(e.into()),
        }
    }

    let data = ctx.template_data().with_form(&form)?;
    state
        .templates
        .render(Page::Password, StatusCode::UNPROCESSABLE_ENTITY, &data)
}
