use reqwest::{header::CONTENT_TYPE, multipart, Method, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::Value;
use std::fmt::Debug;
use tracing::{info, warn};
use xevents_shared::const_config::endpoint::ENDPOINT_LOGIN;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("backend responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend response was not valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

impl ApiError {
    /// The status code the backend responded with if it responded at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) | ApiError::InvalidUrl { .. } => None,
        }
    }
}

/// Selects which base url a path is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Api,
    Auth,
}

#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

#[derive(Default)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<MultipartFile>,
}

impl Debug for MultipartPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let files: Vec<_> = self.files.iter().map(|x| &x.filename).collect();
        f.debug_struct("MultipartPayload")
            .field("fields", &self.fields)
            .field("files", &files)
            .finish()
    }
}

pub struct MultipartFile {
    pub field_name: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MultipartPayload {
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, file: MultipartFile) -> Self {
        self.files.push(file);
        self
    }

    fn into_form(self) -> Result<multipart::Form, ApiError> {
        let mut result = multipart::Form::new();
        for (name, value) in self.fields {
            result = result.text(name, value);
        }
        for file in self.files {
            let mut part = multipart::Part::bytes(file.bytes).file_name(file.filename);
            if let Some(content_type) = file.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            result = result.part(file.field_name, part);
        }
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    api_base_url: String,
    auth_base_url: String,
}

impl ApiClient {
    #[tracing::instrument(name = "NEW API-CLIENT")]
    pub fn new(api_base_url: String, auth_base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_base_url, auth_base_url)
    }

    pub fn with_client(
        http_client: reqwest::Client,
        api_base_url: String,
        auth_base_url: String,
    ) -> Self {
        Self {
            http_client,
            api_base_url,
            auth_base_url,
        }
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str, base: Base) -> Result<reqwest::Url, ApiError> {
        let base_url = match base {
            Base::Api => &self.api_base_url,
            Base::Auth => &self.auth_base_url,
        };
        let url = format!("{base_url}{path}");
        reqwest::Url::parse(&url).map_err(|source| ApiError::InvalidUrl { url, source })
    }

    /// Sends a single request to the backend
    ///
    /// Returns `None` if the backend responded successfully but without a
    /// json body
    #[tracing::instrument(skip(self, body), err(Debug))]
    // WARNING: Must skip body as it may contain sensitive info
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        base: Base,
        body: RequestBody,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.path_to_url(path, base)?;
        let request = self.http_client.request(method, url);
        let request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(payload) => request.multipart(payload.into_form()?),
        };
        let response = request.send().await.inspect_err(|e| {
            info!("Request to backend failed: {e:?}");
        })?;
        process_response(response).await
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.call(Method::GET, path, Base::Api, RequestBody::Empty)
            .await
    }

    pub async fn post_json(&self, path: &str, payload: Value) -> Result<Option<Value>, ApiError> {
        self.call(Method::POST, path, Base::Api, RequestBody::Json(payload))
            .await
    }

    pub async fn put_json(&self, path: &str, payload: Value) -> Result<Option<Value>, ApiError> {
        self.call(Method::PUT, path, Base::Api, RequestBody::Json(payload))
            .await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<Option<Value>, ApiError> {
        self.call(
            Method::POST,
            path,
            Base::Api,
            RequestBody::Multipart(payload),
        )
        .await
    }

    pub async fn put_multipart(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<Option<Value>, ApiError> {
        self.call(Method::PUT, path, Base::Api, RequestBody::Multipart(payload))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.call(Method::DELETE, path, Base::Api, RequestBody::Empty)
            .await
    }

    /// Exchanges credentials for the user record the backend keeps for them
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Value>, ApiError> {
        let args = serde_json::json!({
            "username": username,
            "password": password.expose_secret(),
        });
        self.call(
            Method::POST,
            ENDPOINT_LOGIN,
            Base::Auth,
            RequestBody::Json(args),
        )
        .await
    }

    /// Used by [`crate::fetch_all`] which only accepts a `200 OK`
    pub(crate) async fn get_exact_ok(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.path_to_url(path, Base::Api)?;
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(handle_error(response).await);
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_response(response: reqwest::Response) -> Result<Option<Value>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(handle_error(response).await);
    }
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|x| x.to_str().ok())
        .is_some_and(|x| x.contains("application/json"));
    let bytes = response.bytes().await?;
    if !is_json || bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    debug_assert!(
        status != StatusCode::OK,
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("failed to get response body: {e:?}");
            String::new()
        }
    };
    ApiError::Status { status, body }
}
