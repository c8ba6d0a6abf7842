//! Credential Check Server
//!
//! Scores how likely an email/password pair is compromised.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CREDCHECK SERVER                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌──────────────────────────┐  │
//! │  │  API      │  │  Auth     │  │  Credential Check        │  │
//! │  │  (Axum)   │  │  (JWT,    │  │  4 signal sources ──►    │  │
//! │  │           │  │  API key) │  │  score table ──► audit   │  │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬──────────────┬─────┘  │
//! │        └──────────────┼──────────────┘              │        │
//! │                       ▼                             ▼        │
//! │                ┌─────────────┐             ┌──────────────┐  │
//! │                │ PostgreSQL  │             │ Breach APIs  │  │
//! │                └─────────────┘             └──────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod check;
mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod error;
mod response;
mod validation;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use check::{CredentialChecker, PgAuditSink, SignalCollector, SignalProviders};
use check::providers::{CorpusStore, EmailBreachProvider, KnownPasswordProvider, PasswordRangeProvider, PgCorpusStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Credential check server starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    if config.hibp_api_key.is_none() {
        if config.is_production() {
            tracing::warn!("HIBP_API_KEY not set; email breach signal will always be unavailable");
        } else {
            tracing::debug!("HIBP_API_KEY not set");
        }
    }

    // Initialize database pool
    let pool = db::create_pool(&config.database_url).await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await
        .context("Failed to run migrations")?;

    let checker = build_checker(&config, pool.clone())?;

    // Build application state
    let state = AppState {
        pool,
        config: config.clone(),
        checker: Arc::new(checker),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
        .context("Server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "credcheck_server=debug,tower_http=debug".into());

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Wire the four signal providers and the audit sink
fn build_checker(config: &config::Config, pool: sqlx::PgPool) -> anyhow::Result<CredentialChecker> {
    let http_client = reqwest::Client::builder()
        .timeout(config.provider_timeout())
        .user_agent(config.hibp_user_agent.clone())
        .build()
        .context("Failed to build HTTP client")?;

    let corpus_store: Arc<dyn CorpusStore> = Arc::new(PgCorpusStore::new(pool.clone()));

    let providers = SignalProviders {
        email_breach: Arc::new(EmailBreachProvider::new(
            http_client.clone(),
            config.hibp_api_url.clone(),
            config.hibp_api_key.clone(),
        )),
        password_breach: Arc::new(PasswordRangeProvider::new(
            http_client,
            config.pwned_passwords_api_url.clone(),
            config.hibp_api_key.clone(),
        )),
        dark_web_password: Arc::new(KnownPasswordProvider::dark_web(corpus_store.clone())),
        common_password: Arc::new(KnownPasswordProvider::common(corpus_store)),
    };

    Ok(CredentialChecker::new(
        SignalCollector::new(providers, config.provider_timeout()),
        Arc::new(PgAuditSink::new(pool)),
    ))
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub checker: Arc<CredentialChecker>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/v1/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/v1/api-key", post(handlers::api_key::get_api_key));

    // Session routes (user JWT auth)
    let user_routes = Router::new()
        .route("/api/v1/user", get(handlers::user::get))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    // Check routes (API key auth)
    let check_routes = Router::new()
        .route("/api/v1/check", post(handlers::check::check))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(check_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                ),
        )
        .with_state(state)
}
