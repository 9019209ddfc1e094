use crate::session_state::TypedSession;
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::LOCATION,
    middleware::Next,
    HttpMessage, HttpResponse,
};
use tracing::info;
use xevents_shared::{const_config::route::ROUTE_LOGIN, errors::e500};

/// Ensures a user is stored in the session before letting the request through
///
/// Without a user every method is answered with a redirect to the login page.
/// With one the [`xevents_shared::session::SessionUser`] is made available in
/// the request extensions. The stored value is trusted as is.
#[tracing::instrument(skip(next))]
pub async fn require_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    let session = TypedSession::from_http_request(req.request());

    match session.get_user().map_err(e500)? {
        Some(user) => {
            info!("Validated request for {:?}", user.username());
            req.extensions_mut().insert(user);
            let response = next.call(req).await?;
            Ok(response.map_into_left_body())
        }
        None => {
            info!("No user in session, redirecting to login");
            let response = HttpResponse::SeeOther()
                .insert_header((LOCATION, ROUTE_LOGIN))
                .finish();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}
