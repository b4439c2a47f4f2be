use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use snippetbox_core::DomainError;
use snippetbox_shared::constants::DEFAULT_LOGIN_REDIRECT;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::forms::{PostForm, UserLoginForm, UserSignupForm, BAD_CREDENTIALS, DUPLICATE_EMAIL};
use crate::state::AppState;
use crate::templates::Page;

/// Signup form - GET /user/signup
pub async fn signup(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let data = ctx.template_data().with_form(&UserSignupForm::default())?;
    state.templates.render(Page::Signup, StatusCode::OK, &data)
}

/// Register a user - POST /user/signup
pub async fn signup_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    PostForm(mut form): PostForm<UserSignupForm>,
) -> Result<Response, WebError> {
    if form.validate() {
        match state
            .users
            .insert(&form.name, &form.email, &form.password)
            .await
        {
            Ok(()) => {
                ctx.session
                    .put_flash("Your signup was successful. Please log in.");
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(DomainError::DuplicateEmail) => {
                form.validator.add_field_error("email", DUPLICATE_EMAIL);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = ctx.template_data().with_form(&form)?;
    state
        .templates
        .render(Page::Signup, StatusCode::UNPROCESSABLE_ENTITY, &data)
}

/// Login form - GET /user/login
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let data = ctx.template_data().with_form(&UserLoginForm::default())?;
    state.templates.render(Page::Login, StatusCode::OK, &data)
}

/// Authenticate - POST /user/login
pub async fn login_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    PostForm(mut form): PostForm<UserLoginForm>,
) -> Result<Response, WebError> {
    if form.validate() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(id) => {
                // New privilege level, new token.
                ctx.session.renew_token();
                ctx.session.put_authenticated_user_id(id);
                info!("User {} logged in", id);

                let target = ctx
                    .session
                    .pop_redirect_after_login()
                    .unwrap_or_else(|| DEFAULT_LOGIN_REDIRECT.to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            Err(DomainError::InvalidCredentials) => {
                form.validator.add_non_field_error(BAD_CREDENTIALS);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = ctx.template_data().with_form(&form)?;
    state
        .templates
        .render(Page::Login, StatusCode::UNPROCESSABLE_ENTITY, &data)
}

/// Sign out - POST /user/logout
pub async fn logout_post(ctx: RequestContext) -> Response {
    ctx.session.renew_token();
    ctx.session.remove_authenticated_user_id();
    ctx.session.put_flash("You've been logged out successfully!");
    if let Some(id) = ctx.auth.user_id() {
        info!("User {} logged out", id);
    }
    Redirect::to("/").into_response()
}
