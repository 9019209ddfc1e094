#![warn(unused_crate_dependencies)]

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::net::TcpListener;
use std::ops::Deref;
use std::sync::{Arc, LazyLock, Mutex};
use uuid::Uuid;
use xevents_admin_server::{
    build_runnable_server, get_configuration, get_socket_address, Configuration,
};
use xevents_shared::telemetry::{get_subscriber, init_subscriber, TraceFile, TRACE_FOLDER};

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info";
    let subscriber_name = "test";
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("panel_tests{}", Uuid::new_v4());
        let trace_file = TraceFile::create(TRACE_FOLDER, &log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, trace_file.file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {:?}", trace_file.path)
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

/// A request as received by the [`FakeBackend`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body was not json")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_multipart(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|x| x.starts_with("multipart/form-data"))
    }
}

#[derive(Debug, Clone)]
struct Stub {
    status: StatusCode,
    body: Option<Value>,
}

#[derive(Debug, Default)]
struct BackendState {
    requests: Mutex<Vec<RecordedRequest>>,
    stubs: Mutex<HashMap<(String, String), Stub>>,
}

/// Stands in for the backend. The API is served under `/api` and the auth
/// endpoints under `/auth`, as the real backend lays them out
///
/// Every request is recorded. Requests without a stub get an empty `200 OK`.
/// Paths given to the stubs and lookups are full paths (e.g. `/api/users`).
pub struct FakeBackend {
    pub address: String,
    state: Arc<BackendState>,
}

impl Debug for FakeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeBackend")
            .field("address", &self.address)
            .finish()
    }
}

async fn answer(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<BackendState>,
) -> HttpResponse {
    let method = req.method().to_string();
    let path = req.path().to_string();
    state
        .requests
        .lock()
        .expect("mutex poisoned")
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            content_type: req
                .headers()
                .get("content-type")
                .and_then(|x| x.to_str().ok())
                .map(str::to_string),
            body: body.to_vec(),
        });
    let stub = state
        .stubs
        .lock()
        .expect("mutex poisoned")
        .get(&(method, path))
        .cloned();
    match stub {
        Some(Stub { status, body }) => {
            let mut response = HttpResponse::build(status);
            match body {
                Some(body) => response.json(body),
                None => response.finish(),
            }
        }
        None => HttpResponse::Ok().finish(),
    }
}

impl FakeBackend {
    pub fn spawn() -> anyhow::Result<Self> {
        let state = Arc::new(BackendState::default());
        let listener =
            TcpListener::bind("127.0.0.1:0").context("failed to bind fake backend listener")?;
        let port = listener.local_addr()?.port();
        let data = web::Data::from(Arc::clone(&state));
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::route().to(answer))
        })
        .workers(1)
        .listen(listener)
        .context("failed to listen for fake backend")?
        .run();
        tokio::spawn(server);
        Ok(Self {
            address: format!("http://127.0.0.1:{port}"),
            state,
        })
    }

    pub fn api_base_url(&self) -> String {
        format!("{}/api", self.address)
    }

    pub fn auth_base_url(&self) -> String {
        format!("{}/auth", self.address)
    }

    /// Responds to `method` on `path` with `status` and `body` as json
    pub fn stub_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.insert_stub(method, path, status, Some(body));
    }

    /// Responds to `method` on `path` with `status` and no body
    pub fn stub_status(&self, method: &str, path: &str, status: u16) {
        self.insert_stub(method, path, status, None);
    }

    fn insert_stub(&self, method: &str, path: &str, status: u16, body: Option<Value>) {
        let status = StatusCode::from_u16(status).expect("invalid status code for stub");
        self.state
            .stubs
            .lock()
            .expect("mutex poisoned")
            .insert((method.to_string(), path.to_string()), Stub { status, body });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("mutex poisoned").clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|x| x.method == method && x.path == path)
            .collect()
    }

    /// Requests made to the API, so excluding the login exchange
    pub fn api_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|x| x.path.starts_with("/api/"))
            .collect()
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub backend: FakeBackend,
    pub client: reqwest::Client,
}

impl Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("backend", &self.backend)
            .finish()
    }
}

pub fn port_to_test_address(application_port: u16) -> String {
    format!("http://localhost:{application_port}")
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Starts the panel pointed at a fresh [`FakeBackend`]. `customize` allows
/// changing the configuration before the server is built
pub async fn spawn_app_with(customize: impl FnOnce(&mut Configuration)) -> TestApp {
    start_tracing();
    let backend = FakeBackend::spawn().expect("failed to start fake backend");
    let mut configuration = get_randomized_configuration();
    configuration.backend.api_base_url = backend.api_base_url();
    configuration.backend.auth_base_url = backend.auth_base_url();
    customize(&mut configuration);

    let addr = get_socket_address(&configuration.application).expect("invalid socket address");
    let (server, port) = build_runnable_server(configuration, addr)
        .await
        .expect("failed to build admin panel");
    tokio::spawn(server.run());

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build reqwest client");

    TestApp {
        address: port_to_test_address(port),
        port,
        backend,
        client,
    }
}

/// Use a random OS port and plain http cookies
fn get_randomized_configuration() -> Configuration {
    let mut c = get_configuration().expect("failed to read configuration");
    c.application.host = "127.0.0.1".to_string();
    c.application.port = 0;
    c.application.secure_cookies = false;
    c
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("failed to execute request")
    }

    /// Gets `path` expecting a rendered page and returns its context
    pub async fn get_page(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(response.status().as_u16(), 200, "GET {path}");
        response.json().await.expect("page was not json")
    }

    /// Logs in through the panel with a stubbed backend user
    pub async fn login(&self) -> Value {
        let user = serde_json::json!({"id": 1, "username": "admin", "role": "admin"});
        self.backend
            .stub_json("POST", "/auth/login", 200, user.clone());
        let response = self
            .post_form("/", &[("username", "admin"), ("password", "secret")])
            .await;
        assert_redirect_to(&response, "/dashboard/");
        user
    }
}

pub fn assert_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response
            .headers()
            .get("Location")
            .expect("redirect without a location"),
        location
    );
}

/// Returns the flash messages of a rendered page as `(level, text)`
pub fn messages(page: &Value) -> Vec<(String, String)> {
    page["messages"]
        .as_array()
        .expect("page has no messages list")
        .iter()
        .map(|x| {
            (
                x["level"].as_str().unwrap_or_default().to_string(),
                x["text"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
