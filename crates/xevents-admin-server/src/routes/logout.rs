use crate::context::PanelContext;
use actix_web::{http::header::LOCATION, HttpResponse};
use xevents_shared::const_config::route::ROUTE_LOGIN;

/// Safe to call without being logged in
#[tracing::instrument(skip(ctx))]
pub async fn log_out(ctx: PanelContext) -> HttpResponse {
    ctx.into_session().log_out();
    HttpResponse::SeeOther()
        .insert_header((LOCATION, ROUTE_LOGIN))
        .finish()
}
