use super::resource::{form_routes, list, Resource};
use crate::startup::PanelSettings;
use actix_web::web::{self, ServiceConfig};
use serde_json::Value;
use xevents_api_client::RequestBody;
use xevents_shared::{
    const_config::{endpoint::ENDPOINT_USERS, route::ROUTE_USERS},
    forms::UserForm,
};

pub struct Users;

/// Name of the role field in the user form
const ROLE_FORM_FIELD: &str = "categoryId";

impl Resource for Users {
    type Record = UserForm;

    const NOUN: &'static str = "User";
    const ENDPOINT: &'static str = ENDPOINT_USERS;
    const LIST_ROUTE: &'static str = ROUTE_USERS;
    const LIST_KEY: &'static str = "users";
    const ITEM_KEY: &'static str = "user";
    const LIST_TEMPLATE: &'static str = "users_list.html";
    const FORM_TEMPLATE: &'static str = "user_form.html";
    const DELETE_TEMPLATE: &'static str = "user_confirm_delete.html";

    fn payload(
        record: Self::Record,
        settings: &PanelSettings,
    ) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Json(
            record.to_payload(&settings.user_role_field),
        ))
    }

    /// The backend reports the role under the same key it is sent with
    fn initial_values(mut item: Value, settings: &PanelSettings) -> Value {
        let role_field = settings.user_role_field.as_str();
        if role_field != ROLE_FORM_FIELD {
            if let Some(user) = item.as_object_mut() {
                if let Some(role) = user.get(role_field).cloned() {
                    user.insert(ROLE_FORM_FIELD.to_string(), role);
                }
            }
        }
        item
    }
}

pub fn user_routes(cfg: &mut ServiceConfig) {
    cfg.route("/", web::get().to(list::<Users>));
    form_routes::<Users>(cfg);
}
