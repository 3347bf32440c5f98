//! Tokengate application entry point.
//!
//! Bootstraps the gateway:
//! 1. Load configuration from environment
//! 2. Build the token codec from the signing secret
//! 3. Connect to Redis and upsert the admin user
//! 4. Build the router and apply security middleware
//! 5. Start Axum server

use std::net::SocketAddr;
use std::sync::Arc;
use tokengate::{
    auth::authenticator::AppState,
    auth::{BearerAuthenticator, TokenCodec},
    config::Config,
    middleware::security_headers,
    routes, storage,
};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting tokengate on {}", config.bind_addr);

    // Build the token codec; the secret was validated at config load, so a
    // failure here means the process must not start.
    let codec = Arc::new(
        TokenCodec::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            config.token_lifetime_secs,
        )
        .expect("Failed to build token codec"),
    );

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    let mut con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Upsert admin user (password is hashed before it reaches Redis)
    storage::user::upsert_admin(&mut con, &config.admin_username, &config.admin_password)
        .await
        .expect("Failed to upsert admin user");
    tracing::info!("Admin user '{}' configured", config.admin_username);

    // Build shared state
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
        codec: codec.clone(),
        authenticator: Arc::new(BearerAuthenticator::new(codec)),
    };

    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    // CorsLayer::new() with no allowed origins rejects all CORS preflight requests.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start server (with_connect_info required for ConnectInfo<SocketAddr> extractors)
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
