use crate::{
    authentication::require_session,
    configuration::{ApplicationSettings, Configuration},
    routes::{
        category_routes, dashboard, health_check, inventory_routes, log_out, login, login_form,
        not_found, place_alias_routes, place_routes, user_routes,
    },
};
#[cfg(all(not(feature = "redis-session-rustls"), feature = "cookie-session"))]
use actix_session::storage::CookieSessionStore;
#[cfg(feature = "redis-session-rustls")]
use actix_session::storage::RedisSessionStore;
use actix_session::SessionMiddleware;
use actix_web::{cookie::Key, middleware::from_fn, web, App, HttpServer};
use anyhow::Context as _;
use secrecy::ExposeSecret as _;
use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
};
use tracing::{info, instrument};
use tracing_actix_web::TracingLogger;
use xevents_api_client::ApiClient;
use xevents_shared::{
    const_config::route::{ROUTE_HEALTH_CHECK, ROUTE_LOGIN, ROUTE_LOGOUT},
    media::{PlaceImages, Url},
    telemetry,
};

/// Settings the handlers need beyond the api client
#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub images: PlaceImages,
    pub user_role_field: String,
    pub fetch_concurrency: usize,
}

impl PanelSettings {
    pub fn from_configuration(configuration: &Configuration) -> anyhow::Result<Self> {
        let backend = &configuration.backend;
        let image_base_url = Url::parse(&backend.image_base_url)
            .with_context(|| format!("invalid image base url: {}", backend.image_base_url))?;
        Ok(Self {
            images: PlaceImages::new(image_base_url, backend.default_image_url.clone())?,
            user_role_field: backend.user_role_field.clone(),
            fetch_concurrency: backend.fetch_concurrency,
        })
    }
}

/// Initializes Tracing
pub fn initialize_tracing<Sink>(
    subscriber_name: impl Into<String>,
    default_env_filter_directive: &str,
    sink: Sink,
) -> anyhow::Result<()>
where
    Sink: for<'b> tracing_subscriber::fmt::MakeWriter<'b> + Send + Sync + 'static,
{
    let subscriber = telemetry::get_subscriber(subscriber_name, default_env_filter_directive, sink);
    telemetry::init_subscriber(subscriber).context("failed to initialize the subscriber")
}

pub struct RunnableServer(actix_web::dev::Server);

impl RunnableServer {
    pub async fn run(self) -> anyhow::Result<()> {
        self.0.await.context("admin panel server crashed")
    }
}

/// Binds to `addr` and prepares the server. Use port 0 to have the OS
/// assign one, the port actually used is returned
#[instrument(err(Debug), skip(configuration))]
pub async fn build_runnable_server(
    configuration: Configuration,
    addr: SocketAddr,
) -> anyhow::Result<(RunnableServer, u16)> {
    let settings = PanelSettings::from_configuration(&configuration)?;
    info!(
        user_role_field = %settings.user_role_field,
        "Users are sent to the backend with the role under {:?}", settings.user_role_field
    );
    let settings = web::Data::new(settings);
    let api_client = web::Data::new(ApiClient::new(
        configuration.backend.api_base_url.clone(),
        configuration.backend.auth_base_url.clone(),
    ));

    let secret_key = Key::try_from(
        configuration
            .application
            .hmac_secret
            .expose_secret()
            .as_bytes(),
    )
    .context("hmac_secret must be at least 64 bytes long")?;
    let secure_cookies = configuration.application.secure_cookies;

    #[cfg(feature = "redis-session-rustls")]
    let session_store = {
        let redis_store = RedisSessionStore::new(configuration.redis_uri.expose_secret())
            .await
            .context("failed to connect to Redis")?;
        info!(
            session_store = "RedisSessionStore",
            "Successfully connected to Redis"
        );
        redis_store
    };

    let listener = TcpListener::bind(addr)
        .with_context(|| format!("failed to bind to address: {}", addr))?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    info!(?port, "Port assigned to the server is {port}");

    let server = HttpServer::new(move || {
        #[cfg(all(not(feature = "redis-session-rustls"), feature = "cookie-session"))]
        let session_store = {
            info!(
                // This info is repeated for each thread but less bad than duplicating the cfg
                session_store = "CookieSessionStore",
                "Using Cookie Only Session Storage"
            );
            CookieSessionStore::default()
        };

        #[cfg(feature = "redis-session-rustls")]
        let session_store = session_store.clone(); // When using redis we need to clone

        let session_middleware = SessionMiddleware::builder(session_store, secret_key.clone())
            .cookie_secure(secure_cookies)
            .build();

        App::new()
            .wrap(session_middleware)
            .wrap(TracingLogger::default())
            .service(
                web::resource(ROUTE_LOGIN)
                    .route(web::get().to(login_form))
                    .route(web::post().to(login)),
            )
            .route(ROUTE_LOGOUT, web::post().to(log_out))
            .route(ROUTE_HEALTH_CHECK, web::get().to(health_check))
            .service(
                web::scope("/dashboard")
                    .wrap(from_fn(require_session))
                    .route("/", web::get().to(dashboard)),
            )
            .service(
                web::scope("/users")
                    .wrap(from_fn(require_session))
                    .configure(user_routes),
            )
            .service(
                web::scope("/inventory")
                    .wrap(from_fn(require_session))
                    .configure(inventory_routes),
            )
            .service(
                web::scope("/category")
                    .wrap(from_fn(require_session))
                    .configure(category_routes),
            )
            .service(
                web::scope("/places")
                    .wrap(from_fn(require_session))
                    .configure(place_routes),
            )
            .service(
                web::scope("/place")
                    .wrap(from_fn(require_session))
                    .configure(place_alias_routes),
            )
            .app_data(api_client.clone())
            .app_data(settings.clone())
            .default_service(web::route().to(not_found))
    })
    .listen(listener)
    .context("Failed to bind HTTP Server to listener")?
    .run();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Admin panel prepared to be run"
    );
    Ok((RunnableServer(server), port))
}

pub fn get_socket_address(app_config: &ApplicationSettings) -> anyhow::Result<SocketAddr> {
    let address = format!("{}:{}", app_config.host, app_config.port);
    info!("Socket address to parse is: {address}");
    let result = SocketAddr::from_str(&address)
        .with_context(|| format!("failed to parse address: {address}"))?;
    Ok(result)
}
