//! The list, create, edit and delete flow shared by every managed resource
//!
//! Each resource only states what differs (see [`Resource`]). All backend
//! failures end up as an error flash, never as an error response.

use crate::{
    context::{Outcome, Page, PanelContext},
    startup::PanelSettings,
    submission::FormSubmission,
};
use actix_web::{
    web::{self, ServiceConfig},
    HttpResponse,
};
use serde_json::Value;
use tracing::warn;
use xevents_api_client::{ApiClient, ApiError, Base, Method, RequestBody};
use xevents_shared::{
    const_config::endpoint,
    errors::e500,
    flash::FlashMessage,
    forms::{clean, FieldErrors, FormError, FormInput, FormRecord, FormSchema, FormView},
};

pub trait Resource: 'static {
    type Record: FormRecord;

    /// Used in flash messages
    const NOUN: &'static str;
    const ENDPOINT: &'static str;
    const LIST_ROUTE: &'static str;
    /// Key the items are listed under in the list page
    const LIST_KEY: &'static str;
    /// Key the item is stored under in the delete confirmation page
    const ITEM_KEY: &'static str;
    const LIST_TEMPLATE: &'static str;
    const FORM_TEMPLATE: &'static str;
    const DELETE_TEMPLATE: &'static str;

    fn payload(
        record: Self::Record,
        settings: &PanelSettings,
    ) -> Result<RequestBody, serde_json::Error>;

    /// Hook to add computed values to listed items before they are rendered
    fn prepare_items(items: Vec<Value>, _settings: &PanelSettings) -> Vec<Value> {
        items
    }

    /// Hook to adapt an item from the backend before it pre-fills the form
    fn initial_values(item: Value, _settings: &PanelSettings) -> Value {
        item
    }
}

fn schema<R: Resource>() -> &'static FormSchema {
    <R::Record as FormRecord>::SCHEMA
}

/// Registers the create, edit and delete routes. The list route is left to
/// the resource as some need more than one backend call to build it
pub fn form_routes<R: Resource>(cfg: &mut ServiceConfig) {
    cfg.service(
        web::resource("/create/")
            .route(web::get().to(create_form::<R>))
            .route(web::post().to(create::<R>)),
    )
    .service(
        web::resource("/edit/{id}/")
            .route(web::get().to(edit_form::<R>))
            .route(web::post().to(edit::<R>)),
    )
    .service(
        web::resource("/delete/{id}/")
            .route(web::get().to(delete_confirm::<R>))
            .route(web::post().to(delete::<R>)),
    );
}

/// The backend may answer with an array or with nothing at all
pub fn into_items(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!(?other, "expected a list of items");
            vec![other]
        }
    }
}

#[tracing::instrument(skip_all, fields(resource = R::NOUN))]
pub async fn list<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    settings: web::Data<PanelSettings>,
) -> actix_web::Result<HttpResponse> {
    let (items, flash) = match client.get(R::ENDPOINT).await {
        Ok(value) => (into_items(value), None),
        Err(e) => {
            warn!(?e, "failed to list {}", R::NOUN);
            let flash = FlashMessage::error(format!("Error fetching {} list: {e}", R::NOUN));
            (Vec::new(), Some(flash))
        }
    };
    let items = R::prepare_items(items, &settings);
    let page = Page::new(R::LIST_TEMPLATE)
        .with(R::LIST_KEY, &items)
        .map_err(e500)?;
    ctx.respond(Outcome::Render { page, flash })
}

fn form_page<R: Resource>(form: &FormView, id: Option<&str>) -> Result<Page, serde_json::Error> {
    let page = Page::new(R::FORM_TEMPLATE).with("form", form)?;
    match id {
        Some(id) => page.with("id", id),
        None => Ok(page),
    }
}

/// Shows the submitted values again with the errors found (if any)
fn rerender<R: Resource>(
    input: &FormInput,
    errors: Option<&FieldErrors>,
    id: Option<&str>,
    flash: Option<FlashMessage>,
) -> actix_web::Result<Outcome> {
    let form = FormView::bound(schema::<R>(), input, errors);
    let page = form_page::<R>(&form, id).map_err(e500)?;
    Ok(Outcome::Render { page, flash })
}

#[tracing::instrument(skip_all, fields(resource = R::NOUN))]
pub async fn create_form<R: Resource>(ctx: PanelContext) -> actix_web::Result<HttpResponse> {
    let page = form_page::<R>(&FormView::blank(schema::<R>()), None).map_err(e500)?;
    ctx.respond(Outcome::render(page))
}

/// Validates then sends the record to the backend
///
/// The inner error means the submission should be shown again
async fn submit<R: Resource>(
    client: &ApiClient,
    settings: &PanelSettings,
    input: &FormInput,
    method: Method,
    path: &str,
) -> actix_web::Result<Result<(), Rejected>> {
    let record = match clean::<R::Record>(input) {
        Ok(record) => record,
        Err(FormError::Invalid(errors)) => return Ok(Err(Rejected::Invalid(errors))),
        Err(e @ FormError::Record(_)) => return Err(e500(e)),
    };
    let body = R::payload(record, settings).map_err(e500)?;
    match client.call(method, path, Base::Api, body).await {
        Ok(_) => Ok(Ok(())),
        Err(e) => Ok(Err(Rejected::Api(e))),
    }
}

/// Why a submission was not accepted
enum Rejected {
    Invalid(FieldErrors),
    Api(ApiError),
}

#[tracing::instrument(skip_all, fields(resource = R::NOUN))]
pub async fn create<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    settings: web::Data<PanelSettings>,
    FormSubmission(input): FormSubmission,
) -> actix_web::Result<HttpResponse> {
    let outcome = match submit::<R>(&client, &settings, &input, Method::POST, R::ENDPOINT).await? {
        Ok(()) => Outcome::redirect_with(
            R::LIST_ROUTE,
            FlashMessage::success(format!("Created {} successfully.", R::NOUN)),
        ),
        Err(Rejected::Invalid(errors)) => rerender::<R>(&input, Some(&errors), None, None)?,
        Err(Rejected::Api(e)) => {
            warn!(?e, "failed to create {}", R::NOUN);
            let flash = FlashMessage::error(format!("Error creating {}: {e}", R::NOUN));
            rerender::<R>(&input, None, None, Some(flash))?
        }
    };
    ctx.respond(outcome)
}

#[tracing::instrument(skip(ctx, client, settings), fields(resource = R::NOUN))]
pub async fn edit_form<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    settings: web::Data<PanelSettings>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let outcome = match client.get(&endpoint::item(R::ENDPOINT, &id)).await {
        Ok(item) => {
            let item = R::initial_values(item.unwrap_or_default(), &settings);
            let form = FormView::from_initial(schema::<R>(), &item);
            Outcome::render(form_page::<R>(&form, Some(id.as_str())).map_err(e500)?)
        }
        Err(e) => fetch_failed::<R>(e),
    };
    ctx.respond(outcome)
}

#[tracing::instrument(skip(ctx, client, settings, input), fields(resource = R::NOUN))]
pub async fn edit<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    settings: web::Data<PanelSettings>,
    id: web::Path<String>,
    FormSubmission(input): FormSubmission,
) -> actix_web::Result<HttpResponse> {
    let path = endpoint::item(R::ENDPOINT, &id);
    let outcome = match submit::<R>(&client, &settings, &input, Method::PUT, &path).await? {
        Ok(()) => Outcome::redirect_with(
            R::LIST_ROUTE,
            FlashMessage::success(format!("Updated {} successfully.", R::NOUN)),
        ),
        Err(Rejected::Invalid(errors)) => {
            rerender::<R>(&input, Some(&errors), Some(id.as_str()), None)?
        }
        Err(Rejected::Api(e)) => {
            warn!(?e, "failed to update {}", R::NOUN);
            let flash = FlashMessage::error(format!("Error updating {}: {e}", R::NOUN));
            rerender::<R>(&input, None, Some(id.as_str()), Some(flash))?
        }
    };
    ctx.respond(outcome)
}

#[tracing::instrument(skip(ctx, client), fields(resource = R::NOUN))]
pub async fn delete_confirm<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let outcome = match client.get(&endpoint::item(R::ENDPOINT, &id)).await {
        Ok(item) => {
            let page = Page::new(R::DELETE_TEMPLATE)
                .with(R::ITEM_KEY, &item.unwrap_or_default())
                .and_then(|page| page.with("id", id.as_str()))
                .map_err(e500)?;
            Outcome::render(page)
        }
        Err(e) => fetch_failed::<R>(e),
    };
    ctx.respond(outcome)
}

/// Only deletes if the `confirm` field was submitted
#[tracing::instrument(skip(ctx, client, input), fields(resource = R::NOUN))]
pub async fn delete<R: Resource>(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    id: web::Path<String>,
    FormSubmission(input): FormSubmission,
) -> actix_web::Result<HttpResponse> {
    if !input.contains("confirm") {
        return ctx.respond(Outcome::redirect(R::LIST_ROUTE));
    }
    let outcome = match client.delete(&endpoint::item(R::ENDPOINT, &id)).await {
        Ok(_) => Outcome::redirect_with(
            R::LIST_ROUTE,
            FlashMessage::success(format!("Deleted {} successfully.", R::NOUN)),
        ),
        Err(e) => {
            warn!(?e, "failed to delete {}", R::NOUN);
            Outcome::redirect_with(
                R::LIST_ROUTE,
                FlashMessage::error(format!("Error deleting {}: {e}", R::NOUN)),
            )
        }
    };
    ctx.respond(outcome)
}

fn fetch_failed<R: Resource>(e: ApiError) -> Outcome {
    warn!(?e, "failed to fetch {}", R::NOUN);
    Outcome::redirect_with(
        R::LIST_ROUTE,
        FlashMessage::error(format!("Error fetching {} data: {e}", R::NOUN)),
    )
}
