use crate::{
    context::{Outcome, Page, PanelContext},
    submission::FormSubmission,
};
use actix_web::{web, HttpResponse};
use anyhow::Context as _;
use serde_json::Value;
use tracing::warn;
use xevents_api_client::ApiClient;
use xevents_shared::{
    const_config::route::ROUTE_DASHBOARD,
    errors::e500,
    flash::FlashMessage,
    forms::{clean, schemas, FieldErrors, FormError, FormInput, FormView, LoginForm},
    session::SessionUser,
};

const LOGIN_TEMPLATE: &str = "login.html";
const MSG_LOGIN_FAILED: &str = "Invalid credentials or connection error.";

fn login_page(form: &FormView) -> actix_web::Result<Page> {
    Page::new(LOGIN_TEMPLATE).with("form", form).map_err(e500)
}

fn rerender(
    input: &FormInput,
    errors: Option<&FieldErrors>,
    flash: Option<FlashMessage>,
) -> actix_web::Result<Outcome> {
    let page = login_page(&FormView::bound(&schemas::LOGIN, input, errors))?;
    Ok(Outcome::Render { page, flash })
}

pub async fn login_form(ctx: PanelContext) -> actix_web::Result<HttpResponse> {
    let page = login_page(&FormView::blank(&schemas::LOGIN))?;
    ctx.respond(Outcome::render(page))
}

/// Exchanges the submitted credentials with the backend for a user to keep in
/// the session
///
/// - The session id is renewed on success
/// - Whatever the backend returns as the user is stored without inspection
#[tracing::instrument(
    skip(ctx, client, input),
    fields(username=tracing::field::Empty)
)]
pub async fn login(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    FormSubmission(input): FormSubmission,
) -> actix_web::Result<HttpResponse> {
    let credentials = match clean::<LoginForm>(&input) {
        Ok(credentials) => credentials,
        Err(FormError::Invalid(errors)) => {
            return ctx.respond(rerender(&input, Some(&errors), None)?);
        }
        Err(e @ FormError::Record(_)) => return Err(e500(e)),
    };
    tracing::Span::current().record("username", tracing::field::display(&credentials.username));

    let outcome = match client
        .login(&credentials.username, &credentials.password)
        .await
    {
        Ok(user) => {
            let session = ctx.session();
            session.renew();
            session
                .insert_user(&SessionUser(user.unwrap_or(Value::Null)))
                .context("session update failed")
                .map_err(e500)?;
            Outcome::redirect(ROUTE_DASHBOARD)
        }
        Err(e) => {
            warn!(?e, "login failed");
            rerender(&input, None, Some(FlashMessage::error(MSG_LOGIN_FAILED)))?
        }
    };
    ctx.respond(outcome)
}
