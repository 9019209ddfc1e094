use crate::context::{Outcome, Page, PanelContext};
use actix_web::HttpResponse;

#[tracing::instrument(skip(ctx), fields(username = ctx.user().and_then(|u| u.username())))]
pub async fn dashboard(ctx: PanelContext) -> actix_web::Result<HttpResponse> {
    ctx.respond(Outcome::render(Page::new("dashboard.html")))
}
