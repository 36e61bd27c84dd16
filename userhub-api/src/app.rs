/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use userhub_api::{app::AppState, config::Config};
/// use userhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use userhub_shared::mail::LogMailSender;
/// use userhub_shared::repository::PgUserRepository;
/// use userhub_shared::service::UserService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
///
/// let users = UserService::new(
///     Arc::new(PgUserRepository::new(pool)),
///     Arc::new(LogMailSender),
///     &config.urls.public_base_url,
/// );
/// let app = userhub_api::app::build_router(AppState::new(users, config));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{identity::require_email, security::security_headers},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use userhub_shared::service::UserService;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User account operations
    pub users: UserService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(users: UserService, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                    # Health check (public)
/// ├── GET  /health_check.html         # Health check alias
/// └── /api/users
///     ├── POST /                      # Create user
///     ├── GET  /:id                   # Get ACTIVE user
///     ├── GET  /:id/verify            # Certify email, redirect to frontend
///     ├── GET  /me                    # Own profile (EMAIL header)
///     └── PUT  /me                    # Update own profile (EMAIL header)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Caller identity (`/me` routes only)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health_check.html", get(routes::health::health_check));

    // Routes acting on the caller's own account
    let me_routes = Router::new()
        .route(
            "/me",
            get(routes::users::get_my_info).put(routes::users::update_my_info),
        )
        .layer(middleware::from_fn(require_email));

    let user_routes = Router::new()
        .route("/", post(routes::users::create_user))
        .route("/:id", get(routes::users::get_user))
        .route("/:id/verify", get(routes::users::verify_email))
        .merge(me_routes);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/api/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(middleware::from_fn_with_state(
            state.config.api.production,
            security_headers,
        ))
        .with_state(state)
}

/// Permissive CORS when `*` is configured, otherwise an explicit allow-list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static("email")])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
