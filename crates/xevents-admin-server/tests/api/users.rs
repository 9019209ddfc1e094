use crate::helpers::{
    assert_redirect_to, field_error, field_value, messages, messages_after_redirect, spawn_app,
    spawn_app_with, success,
};
use serde_json::json;

const VALID_USER: &[(&str, &str)] = &[
    ("username", "jdoe"),
    ("email", "jdoe@example.com"),
    ("firstName", "John"),
    ("lastName", "Doe"),
    ("categoryId", "2"),
];

#[tokio::test]
async fn list_shows_backend_users() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let users = json!([{"id": 1, "username": "jdoe"}, {"id": 2, "username": "asmith"}]);
    app.backend.stub_json("GET", "/api/users", 200, users.clone());

    // Act
    let page = app.get_page("/users/").await;

    // Assert
    assert_eq!(page["template"], "users_list.html");
    assert_eq!(page["context"]["users"], users);
    assert!(messages(&page).is_empty());
}

#[tokio::test]
async fn list_failure_shows_empty_list_and_error() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend
        .stub_json("GET", "/api/users", 500, json!({"detail": "boom"}));

    // Act
    let page = app.get_page("/users/").await;

    // Assert
    assert_eq!(page["context"]["users"], json!([]));
    let actual = messages(&page);
    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].0, "error");
    assert!(actual[0].1.starts_with("Error fetching User list"), "{}", actual[0].1);
}

#[tokio::test]
async fn create_form_is_blank() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let page = app.get_page("/users/create/").await;

    // Assert
    assert_eq!(page["template"], "user_form.html");
    assert_eq!(field_value(&page, "username"), "");
    assert!(page["context"].get("id").is_none());
}

#[tokio::test]
async fn create_with_missing_fields_is_not_sent() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app
        .post_form("/users/create/", &[("username", "jdoe"), ("email", "nope")])
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(field_value(&page, "username"), "jdoe");
    assert_eq!(
        field_error(&page, "email").as_deref(),
        Some("Enter a valid email address.")
    );
    assert_eq!(
        field_error(&page, "firstName").as_deref(),
        Some("This field is required.")
    );
    assert!(app.backend.api_requests().is_empty());
}

#[tokio::test]
async fn create_sends_user_and_flashes_once() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_json("POST", "/api/users", 201, json!({"id": 9}));

    // Act
    let response = app.post_form("/users/create/", VALID_USER).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    let sent = app.backend.requests_to("POST", "/api/users");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].json(),
        json!({
            "username": "jdoe",
            "email": "jdoe@example.com",
            "firstName": "John",
            "lastName": "Doe",
            "roleId": 2
        })
    );
    assert_eq!(
        messages_after_redirect(&app, &response).await,
        [success("Created User successfully.")]
    );
    assert!(messages(&app.get_page("/users/").await).is_empty());
}

#[tokio::test]
async fn role_field_follows_configuration() {
    // Arrange
    let app = spawn_app_with(|c| c.backend.user_role_field = "categoryId".to_string()).await;
    app.login().await;

    // Act
    let response = app.post_form("/users/create/", VALID_USER).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    let sent = app.backend.requests_to("POST", "/api/users");
    assert_eq!(sent[0].json()["categoryId"], 2);
    assert!(sent[0].json().get("roleId").is_none());
}

#[tokio::test]
async fn create_rejected_by_backend_keeps_values() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend
        .stub_json("POST", "/api/users", 400, json!({"username": ["taken"]}));

    // Act
    let response = app.post_form("/users/create/", VALID_USER).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page["template"], "user_form.html");
    assert_eq!(field_value(&page, "firstName"), "John");
    let actual = messages(&page);
    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].0, "error");
    assert!(actual[0].1.starts_with("Error creating User: "), "{}", actual[0].1);
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_json(
        "GET",
        "/api/users/7",
        200,
        json!({"id": 7, "username": "jdoe", "email": "jdoe@example.com", "categoryId": 2}),
    );

    // Act
    let page = app.get_page("/users/edit/7/").await;

    // Assert
    assert_eq!(page["context"]["id"], "7");
    assert_eq!(field_value(&page, "username"), "jdoe");
    assert_eq!(field_value(&page, "categoryId"), "2");
    assert_eq!(field_value(&page, "firstName"), "");
}

#[tokio::test]
async fn edit_form_prefills_role_from_configured_key() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_json(
        "GET",
        "/api/users/7",
        200,
        json!({"id": 7, "username": "jdoe", "roleId": 2}),
    );

    // Act
    let page = app.get_page("/users/edit/7/").await;

    // Assert
    assert_eq!(field_value(&page, "categoryId"), "2");
}

#[tokio::test]
async fn edit_form_fetch_failure_returns_to_list() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status("GET", "/api/users/7", 404);

    // Act
    let response = app.get("/users/edit/7/").await;

    // Assert
    assert_redirect_to(&response, "/users/");
    let actual = messages_after_redirect(&app, &response).await;
    assert_eq!(actual.len(), 1);
    assert!(actual[0].1.starts_with("Error fetching User data"), "{}", actual[0].1);
}

#[tokio::test]
async fn edit_sends_put() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_form("/users/edit/7/", VALID_USER).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    let sent = app.backend.requests_to("PUT", "/api/users/7");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json()["username"], "jdoe");
    assert_eq!(
        messages_after_redirect(&app, &response).await,
        [success("Updated User successfully.")]
    );
}

#[tokio::test]
async fn edit_rejected_by_backend_is_shown_again() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status("PUT", "/api/users/7", 500);

    // Act
    let response = app.post_form("/users/edit/7/", VALID_USER).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page["context"]["id"], "7");
    assert!(messages(&page)[0].1.starts_with("Error updating User: "));
}

#[tokio::test]
async fn delete_confirmation_shows_user() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let user = json!({"id": 7, "username": "jdoe"});
    app.backend.stub_json("GET", "/api/users/7", 200, user.clone());

    // Act
    let page = app.get_page("/users/delete/7/").await;

    // Assert
    assert_eq!(page["template"], "user_confirm_delete.html");
    assert_eq!(page["context"]["user"], user);
    assert!(app.backend.requests_to("DELETE", "/api/users/7").is_empty());
}

#[tokio::test]
async fn delete_without_confirmation_does_nothing() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_form("/users/delete/7/", &[]).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    assert!(app.backend.requests_to("DELETE", "/api/users/7").is_empty());
    assert!(messages_after_redirect(&app, &response).await.is_empty());
}

#[tokio::test]
async fn delete_with_confirmation_removes_user() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status("DELETE", "/api/users/7", 204);

    // Act
    let response = app.post_form("/users/delete/7/", &[("confirm", "yes")]).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    assert_eq!(app.backend.requests_to("DELETE", "/api/users/7").len(), 1);
    assert_eq!(
        messages_after_redirect(&app, &response).await,
        [success("Deleted User successfully.")]
    );
}

#[tokio::test]
async fn delete_failure_is_flashed() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status("DELETE", "/api/users/7", 500);

    // Act
    let response = app.post_form("/users/delete/7/", &[("confirm", "yes")]).await;

    // Assert
    assert_redirect_to(&response, "/users/");
    let actual = messages_after_redirect(&app, &response).await;
    assert_eq!(actual[0].0, "error");
    assert!(actual[0].1.starts_with("Error deleting User: "));
}
