use anyhow::Context as _;
use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::convert::{TryFrom, TryInto};
use xevents_shared::const_config::backend::DEFAULT_FETCH_CONCURRENCY;

#[derive(serde::Deserialize, Clone)]
pub struct Configuration {
    pub application: ApplicationSettings,
    pub backend: BackendSettings,
    /// Only used when built with the `redis-session-rustls` feature
    pub redis_uri: SecretString,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub hmac_secret: SecretString,
    /// Browsers only send secure cookies over https
    pub secure_cookies: bool,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct BackendSettings {
    pub api_base_url: String,
    pub auth_base_url: String,
    /// Stored place images are served from here
    pub image_base_url: String,
    pub default_image_url: String,
    #[serde(
        default = "default_fetch_concurrency",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub fetch_concurrency: usize,
    /// The user form collects `categoryId` but the backend may expect the role
    /// under another key
    #[serde(default = "default_user_role_field")]
    pub user_role_field: String,
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

fn default_user_role_field() -> String {
    "roleId".to_string()
}

pub fn get_configuration() -> anyhow::Result<Configuration> {
    let base_path = std::env::current_dir().context("failed to determine the current directory")?;

    // Tests start at the crate root so the folder is kept beside Cargo.toml
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)
        .context("failed to parse APP_ENVIRONMENT")?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_BACKEND__API_BASE_URL=http://api:8080` would set `Settings.backend.api_base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("failed to load configuration sources")?;

    settings
        .try_deserialize::<Configuration>()
        .context("failed to deserialize configuration")
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
