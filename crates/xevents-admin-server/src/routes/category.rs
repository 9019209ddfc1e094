use super::resource::{form_routes, list, Resource};
use crate::startup::PanelSettings;
use actix_web::web::{self, ServiceConfig};
use xevents_api_client::RequestBody;
use xevents_shared::{
    const_config::{endpoint::ENDPOINT_INVENTORY_CATEGORIES, route::ROUTE_CATEGORY},
    forms::CategoryForm,
};

pub struct Categories;

impl Resource for Categories {
    type Record = CategoryForm;

    const NOUN: &'static str = "Inventory Category";
    const ENDPOINT: &'static str = ENDPOINT_INVENTORY_CATEGORIES;
    const LIST_ROUTE: &'static str = ROUTE_CATEGORY;
    const LIST_KEY: &'static str = "categories";
    const ITEM_KEY: &'static str = "category";
    const LIST_TEMPLATE: &'static str = "category_list.html";
    const FORM_TEMPLATE: &'static str = "category_form.html";
    const DELETE_TEMPLATE: &'static str = "category_confirm_delete.html";

    fn payload(
        record: Self::Record,
        _settings: &PanelSettings,
    ) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Json(serde_json::to_value(record)?))
    }
}

pub fn category_routes(cfg: &mut ServiceConfig) {
    cfg.route("/", web::get().to(list::<Categories>));
    form_routes::<Categories>(cfg);
}
