mod category;
mod dashboard;
mod health_check;
mod inventory;
mod login;
mod logout;
mod places;
mod resource;
mod users;

use actix_web::{HttpRequest, HttpResponse};
pub use category::category_routes;
pub use dashboard::dashboard;
pub use health_check::health_check;
pub use inventory::inventory_routes;
pub use login::{login, login_form};
pub use logout::log_out;
pub use places::{place_alias_routes, place_routes};
pub use users::user_routes;
use xevents_shared::debug_panic;

#[tracing::instrument]
pub async fn not_found(req: HttpRequest) -> actix_web::Result<HttpResponse> {
    tracing::error!("Failed to match route");
    debug_panic!(format!(
        "404 - {} to '{}' Not found\n",
        req.method(),
        req.path()
    ));
    Ok(HttpResponse::NotFound().body(format!(
        "404 - {} to '{}' Not found\n",
        req.method(),
        req.path()
    )))
}
