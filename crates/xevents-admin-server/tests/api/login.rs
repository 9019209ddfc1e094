use crate::helpers::{
    assert_redirect_to, field_error, field_value, form_field, messages, spawn_app,
};
use serde_json::json;

#[tokio::test]
async fn login_page_shows_blank_form() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let page = app.get_page("/").await;

    // Assert
    assert_eq!(page["template"], "login.html");
    assert_eq!(form_field(&page, "username")["max_length"], 25);
    assert_eq!(form_field(&page, "password")["widget"], "password");
    assert!(messages(&page).is_empty());
}

#[tokio::test]
async fn login_success_stores_user_and_redirects() {
    // Arrange
    let app = spawn_app().await;
    app.backend
        .stub_json("POST", "/auth/login", 200, json!({"username": "ana"}));

    // Act
    let response = app
        .post_form("/", &[("username", "ana"), ("password", "pa55word")])
        .await;

    // Assert
    assert_redirect_to(&response, "/dashboard/");
    let sent = app.backend.requests_to("POST", "/auth/login");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].json(),
        json!({"username": "ana", "password": "pa55word"})
    );
    let page = app.get_page("/dashboard/").await;
    assert_eq!(page["user"], json!({"username": "ana"}));
}

#[tokio::test]
async fn login_missing_fields_are_reported_without_backend_call() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_form("/", &[("username", "  ")]).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        field_error(&page, "username").as_deref(),
        Some("This field is required.")
    );
    assert_eq!(
        field_error(&page, "password").as_deref(),
        Some("This field is required.")
    );
    assert!(app.backend.requests().is_empty());
}

#[tokio::test]
async fn login_rejected_by_backend_shows_error_flash() {
    // Arrange
    let app = spawn_app().await;
    app.backend.stub_status("POST", "/auth/login", 401);

    // Act
    let response = app
        .post_form("/", &[("username", "ana"), ("password", "wrong")])
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        messages(&page),
        [(
            "error".to_string(),
            "Invalid credentials or connection error.".to_string()
        )]
    );
    assert_eq!(field_value(&page, "username"), "ana");
    assert_eq!(field_value(&page, "password"), "");
    assert_redirect_to(&app.get("/dashboard/").await, "/");
}
