use serde_json::Value;

pub use xevents_server_test_helper::{
    assert_redirect_to, messages, spawn_app, spawn_app_with, TestApp,
};

/// Looks up a field of the form shown on `page`
pub fn form_field<'a>(page: &'a Value, name: &str) -> &'a Value {
    page["context"]["form"]["fields"]
        .as_array()
        .expect("page has no form")
        .iter()
        .find(|x| x["name"] == name)
        .unwrap_or_else(|| panic!("form has no field named {name}"))
}

pub fn field_value(page: &Value, name: &str) -> String {
    form_field(page, name)["value"]
        .as_str()
        .expect("field value is not a string")
        .to_string()
}

pub fn field_error(page: &Value, name: &str) -> Option<String> {
    form_field(page, name)["error"].as_str().map(str::to_string)
}

/// Follows a redirect and returns the flash messages shown on arrival
pub async fn messages_after_redirect(
    app: &TestApp,
    response: &reqwest::Response,
) -> Vec<(String, String)> {
    let location = response
        .headers()
        .get("Location")
        .expect("not a redirect")
        .to_str()
        .unwrap()
        .to_string();
    messages(&app.get_page(&location).await)
}

pub fn success(text: &str) -> (String, String) {
    ("success".to_string(), text.to_string())
}
