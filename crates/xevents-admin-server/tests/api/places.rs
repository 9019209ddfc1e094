use crate::helpers::{
    assert_redirect_to, field_error, field_value, messages, messages_after_redirect, spawn_app,
    success,
};
use reqwest::multipart::{Form, Part};
use rstest::rstest;
use serde_json::json;

fn place_form() -> Form {
    Form::new()
        .text("placeName", "Central Park")
        .text("description", "")
        .text("about", "Green")
        .text("location", "Downtown")
}

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn image(filename: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn list_resolves_image_urls() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_json(
        "GET",
        "/api/places",
        200,
        json!([
            {"id": 1, "placeName": "Park", "image": r"uploads\photo.jpg"},
            {"id": 2, "placeName": "Hall", "image": null}
        ]),
    );

    // Act
    let page = app.get_page("/places/").await;

    // Assert
    assert_eq!(page["template"], "places_list.html");
    let places = &page["context"]["places"];
    assert_eq!(
        places[0]["image_url"],
        "http://localhost:8080/images/photo.jpg"
    );
    assert_eq!(
        places[1]["image_url"],
        "/static/images/default-placeholder.png"
    );
}

#[tokio::test]
async fn create_with_image_is_forwarded_as_multipart() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let form = place_form().part("image", image("park.png", PNG_BYTES));

    // Act
    let response = app.post_multipart("/places/create/", form).await;

    // Assert
    assert_redirect_to(&response, "/places/");
    let sent = app.backend.requests_to("POST", "/api/places");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].is_multipart());
    let body = sent[0].body_text();
    assert!(body.contains(r#"name="placeName""#));
    assert!(body.contains("Central Park"));
    assert!(body.contains(r#"name="imageFileName""#));
    assert!(body.contains(r#"filename="park.png""#));
    assert!(body.contains("IHDR"));
    assert_eq!(
        messages_after_redirect(&app, &response).await,
        [success("Created Place successfully.")]
    );
}

#[tokio::test]
async fn create_without_image_sends_text_fields_only() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_multipart("/places/create/", place_form()).await;

    // Assert
    assert_redirect_to(&response, "/places/");
    let sent = app.backend.requests_to("POST", "/api/places");
    assert_eq!(sent.len(), 1);
    let body = sent[0].body_text();
    assert!(body.contains(r#"name="location""#));
    assert!(!body.contains("imageFileName"));
}

#[rstest]
#[case::text_file(image("notes.txt", b"hello"))]
#[case::script_named_png(image("evil.png", b"#!/bin/sh\necho hi\n"))]
#[case::empty_png(image("blank.png", b""))]
#[tokio::test]
async fn non_image_upload_is_rejected(#[case] upload: Part) {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let form = place_form().part("image", upload);

    // Act
    let response = app.post_multipart("/places/create/", form).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page["template"], "places_form.html");
    assert_eq!(page["context"]["form"]["multipart"], true);
    assert!(field_error(&page, "image").is_some());
    assert!(app.backend.api_requests().is_empty());
}

#[tokio::test]
async fn singular_alias_returns_to_places_list() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_multipart("/place/create/", place_form()).await;

    // Assert
    assert_redirect_to(&response, "/places/");
    assert_eq!(app.backend.requests_to("POST", "/api/places").len(), 1);
}

#[tokio::test]
async fn edit_sends_put_as_multipart() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;

    // Act
    let response = app.post_multipart("/places/edit/4/", place_form()).await;

    // Assert
    assert_redirect_to(&response, "/places/");
    let sent = app.backend.requests_to("PUT", "/api/places/4");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].is_multipart());
    assert_eq!(
        messages_after_redirect(&app, &response).await,
        [success("Updated Place successfully.")]
    );
}

#[tokio::test]
async fn missing_required_fields_are_not_sent() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let form = Form::new().text("about", "Green");

    // Act
    let response = app.post_multipart("/places/create/", form).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    for field in ["placeName", "location"] {
        assert_eq!(
            field_error(&page, field).as_deref(),
            Some("This field is required."),
            "{field}"
        );
    }
    assert_eq!(field_value(&page, "about"), "Green");
    assert!(app.backend.api_requests().is_empty());
}

#[tokio::test]
async fn create_rejected_by_backend_keeps_values() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    app.backend.stub_status("POST", "/api/places", 500);

    // Act
    let response = app.post_multipart("/places/create/", place_form()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let page: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page["template"], "places_form.html");
    assert_eq!(field_value(&page, "placeName"), "Central Park");
    let actual = messages(&page);
    assert_eq!(actual.len(), 1);
    assert!(actual[0].1.starts_with("Error creating Place: "), "{}", actual[0].1);
}

#[tokio::test]
async fn oversized_text_field_is_refused() {
    // Arrange
    let app = spawn_app().await;
    app.login().await;
    let form = place_form().text("about", "a".repeat(64 * 1024 + 1));

    // Act
    let response = app.post_multipart("/places/create/", form).await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    assert!(app.backend.api_requests().is_empty());
}
