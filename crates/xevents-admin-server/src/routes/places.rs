use super::resource::{form_routes, list, Resource};
use crate::startup::PanelSettings;
use actix_web::web::{self, ServiceConfig};
use serde_json::Value;
use xevents_api_client::{MultipartFile, MultipartPayload, RequestBody};
use xevents_shared::{
    const_config::{endpoint::ENDPOINT_PLACES, route::ROUTE_PLACES},
    forms::PlaceForm,
};

pub struct Places;

impl Resource for Places {
    type Record = PlaceForm;

    const NOUN: &'static str = "Place";
    const ENDPOINT: &'static str = ENDPOINT_PLACES;
    const LIST_ROUTE: &'static str = ROUTE_PLACES;
    const LIST_KEY: &'static str = "places";
    const ITEM_KEY: &'static str = "place";
    const LIST_TEMPLATE: &'static str = "places_list.html";
    const FORM_TEMPLATE: &'static str = "places_form.html";
    const DELETE_TEMPLATE: &'static str = "places_confirm_delete.html";

    /// The backend only accepts places as multipart
    fn payload(
        record: Self::Record,
        _settings: &PanelSettings,
    ) -> Result<RequestBody, serde_json::Error> {
        let mut result = MultipartPayload::default()
            .text("placeName", record.place_name)
            .text("description", record.description)
            .text("about", record.about)
            .text("location", record.location);
        if let Some(image) = record.image {
            result = result
                .text("imageFileName", image.filename.clone())
                .file(MultipartFile {
                    field_name: "image".to_string(),
                    filename: image.filename,
                    content_type: image.content_type,
                    bytes: image.bytes,
                });
        }
        Ok(RequestBody::Multipart(result))
    }

    fn prepare_items(mut items: Vec<Value>, settings: &PanelSettings) -> Vec<Value> {
        for place in items.iter_mut() {
            let image_url = settings
                .images
                .image_url(place.get("image").and_then(Value::as_str));
            if let Some(place) = place.as_object_mut() {
                place.insert("image_url".to_string(), Value::String(image_url));
            }
        }
        items
    }
}

pub fn place_routes(cfg: &mut ServiceConfig) {
    cfg.route("/", web::get().to(list::<Places>));
    form_routes::<Places>(cfg);
}

/// Also reachable under `/place/` but only for the form routes
pub fn place_alias_routes(cfg: &mut ServiceConfig) {
    form_routes::<Places>(cfg);
}
