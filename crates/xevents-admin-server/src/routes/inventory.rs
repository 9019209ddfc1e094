use super::resource::{form_routes, into_items, Resource};
use crate::{
    context::{Outcome, Page, PanelContext},
    startup::PanelSettings,
};
use actix_web::{
    web::{self, ServiceConfig},
    HttpResponse,
};
use xevents_api_client::{fetch_all, ApiClient, RequestBody};
use xevents_shared::{
    const_config::{
        endpoint::{ENDPOINT_INVENTORIES, ENDPOINT_INVENTORY_CATEGORIES},
        route::ROUTE_INVENTORY,
    },
    errors::e500,
    forms::InventoryForm,
};

pub struct Inventory;

impl Resource for Inventory {
    type Record = InventoryForm;

    const NOUN: &'static str = "Inventory";
    const ENDPOINT: &'static str = ENDPOINT_INVENTORIES;
    const LIST_ROUTE: &'static str = ROUTE_INVENTORY;
    const LIST_KEY: &'static str = "inventories";
    const ITEM_KEY: &'static str = "inventory";
    const LIST_TEMPLATE: &'static str = "inventory_list.html";
    const FORM_TEMPLATE: &'static str = "inventory_form.html";
    const DELETE_TEMPLATE: &'static str = "inventory_confirm_delete.html";

    fn payload(
        record: Self::Record,
        _settings: &PanelSettings,
    ) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Json(serde_json::to_value(record)?))
    }
}

/// Lists the items together with the categories. Either list is left empty if
/// it could not be fetched
#[tracing::instrument(skip_all)]
pub async fn inventory_list(
    ctx: PanelContext,
    client: web::Data<ApiClient>,
    settings: web::Data<PanelSettings>,
) -> actix_web::Result<HttpResponse> {
    let mut fetched = fetch_all(
        &client,
        &[ENDPOINT_INVENTORIES, ENDPOINT_INVENTORY_CATEGORIES],
        settings.fetch_concurrency,
    )
    .await;
    let inventories = into_items(fetched.remove(ENDPOINT_INVENTORIES).flatten());
    let categories = into_items(fetched.remove(ENDPOINT_INVENTORY_CATEGORIES).flatten());
    let page = Page::new(Inventory::LIST_TEMPLATE)
        .with(Inventory::LIST_KEY, &inventories)
        .and_then(|page| page.with("categories", &categories))
        .map_err(e500)?;
    ctx.respond(Outcome::render(page))
}

pub fn inventory_routes(cfg: &mut ServiceConfig) {
    cfg.route("/", web::get().to(inventory_list));
    form_routes::<Inventory>(cfg);
}
