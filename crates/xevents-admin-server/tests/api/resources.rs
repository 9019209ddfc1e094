//! Behavior every managed resource shares

use crate::helpers::{field_error, field_value, messages, spawn_app};
use rstest::rstest;

const USER: &[(&str, &str)] = &[
    ("username", "jdoe"),
    ("email", "jdoe@example.com"),
    ("firstName", "John"),
    ("lastName", "Doe"),
    ("categoryId", "2"),
];
const INVENTORY: &[(&str, &str)] = &[
    ("name", "Chair"),
    ("stockQuantity", "12"),
    ("maintenanceStatus", "good_condition"),
    ("isAvailable", "true"),
    ("categoryId", "1"),
];
const CATEGORY: &[(&str, &str)] = &[("category", "Audio")];
const PLACE: &[(&str, &str)] = &[("placeName", "Central Park"), ("location", "Downtown")];

#[rstest]
#[case::user("/users/create/", "username")]
#[case::user_edit("/users/edit/7/", "email")]
#[case::inventory("/inventory/create/", "stockQuantity")]
#[case::inventory_edit("/inventory/edit/5/", "maintenanceStatus")]
#[case::category("/category/create/", "category")]
#[case::category_edit("/category/edit/3/", "category")]
#[case::place("/places/create/", "placeName")]
#[case::place_edit("/places/edit/4/", "location")]
#[tokio::test]
async fn empty_submission_is_not_sent(#[case] path: &str, #[case] required_field: &str) {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_form(path, &[]).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        field_error(&page, required_field).as_deref(),
        Some("This field is required.")
    );
    assert!(app.backend.api_requests().is_empty());
}

#[rstest]
#[case::user("/users/create/", "POST", "/api/users", USER, "user_form.html", "Error creating User: ")]
#[case::user_edit("/users/edit/7/", "PUT", "/api/users/7", USER, "user_form.html", "Error updating User: ")]
#[case::inventory(
    "/inventory/create/",
    "POST",
    "/api/inventories",
    INVENTORY,
    "inventory_form.html",
    "Error creating Inventory: "
)]
#[case::inventory_edit(
    "/inventory/edit/5/",
    "PUT",
    "/api/inventories/5",
    INVENTORY,
    "inventory_form.html",
    "Error updating Inventory: "
)]
#[case::category(
    "/category/create/",
    "POST",
    "/api/inventories/categories",
    CATEGORY,
    "category_form.html",
    "Error creating Inventory Category: "
)]
#[case::category_edit(
    "/category/edit/3/",
    "PUT",
    "/api/inventories/categories/3",
    CATEGORY,
    "category_form.html",
    "Error updating Inventory Category: "
)]
#[case::place("/places/create/", "POST", "/api/places", PLACE, "places_form.html", "Error creating Place: ")]
#[case::place_edit("/places/edit/4/", "PUT", "/api/places/4", PLACE, "places_form.html", "Error updating Place: ")]
#[tokio::test]
async fn backend_failure_keeps_submitted_values(
    #[case] path: &str,
    #[case] backend_method: &str,
    #[case] backend_path: &str,
    #[case] form: &[(&str, &str)],
    #[case] template: &str,
    #[case] flash_prefix: &str,
) {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status(backend_method, backend_path, 500);

    // Act
    let response = app.post_form(path, form).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page["template"], template);
    for (name, value) in form {
        assert_eq!(field_value(&page, name), *value, "{name}");
    }
    let actual = messages(&page);
    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].0, "error");
    assert!(actual[0].1.starts_with(flash_prefix), "{}", actual[0].1);
    assert_eq!(
        app.backend.requests_to(backend_method, backend_path).len(),
        1
    );
}
