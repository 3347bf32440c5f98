//! API route handlers.

pub mod auth;

use crate::auth::authenticator::AppState;
use axum::{routing::get, routing::post, Router};

/// Build the API router with all endpoints.
///
/// Paths keep their trailing slashes; they are part of the external
/// contract. Wrong methods on a known path get axum's 405.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login/", post(auth::login))
        .route("/api/auth/verify/", post(auth::verify_token))
        .route("/api/auth/validate/", get(auth::validate_token))
}
