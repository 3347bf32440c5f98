//! Auth API endpoints: issue, verify, and validate tokens.

use crate::auth::authenticator::{check_rate_limit, AppState, AuthPrincipal};
use crate::error::AppError;
use crate::models::{
    LoginRequest, LoginResponse, ValidateResponse, VerifyRequest, VerifyResponse,
};
use crate::storage;
use axum::{
    extract::{ConnectInfo, State},
    response::IntoResponse,
    Json,
};
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;

/// POST /api/auth/login/ — Exchange credentials for a signed token.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = req.username.trim();

    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Rate limit by IP
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let rate_limit_key = format!("ratelimit:login:{}", addr.ip());
    let allowed = check_rate_limit(
        &mut con,
        &rate_limit_key,
        state.config.rate_limit_login_per_min,
        60,
    )
    .await
    .map_err(|e| AppError::Internal(format!("Rate limit check failed: {}", e)))?;

    if !allowed {
        let mut hasher = std::hash::DefaultHasher::new();
        addr.ip().hash(&mut hasher);
        let ip_hash = format!("{:x}", hasher.finish());
        tracing::warn!(action = "rate_limited", endpoint = "auth/login", ip_hash = %ip_hash, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    // Look up the user and check the password. Unknown user and wrong
    // password produce the same response: the body must not reveal
    // whether the username exists.
    let user = storage::user::get_user(&mut con, username).await?;

    let matched = match &user {
        Some(user) => crate::auth::password::verify_password(&req.password, &user.password_hash),
        None => false,
    };

    if !matched {
        tracing::warn!(action = "login_failed", username = %username, "Invalid credentials");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let issued = state.codec.encode(username)?;

    tracing::info!(action = "login_success", username = %username, jti = %issued.claims.jti, "Token issued");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires: issued.claims.expires_at().to_rfc3339(),
    }))
}

/// POST /api/auth/verify/ — Report whether a token is valid.
///
/// Introspection, not a gate: an invalid token still gets a 200, with the
/// reason in the body. Only the missing-token case is a request error.
pub async fn verify_token(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.token.is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }

    let response = match state.codec.decode(&req.token) {
        Ok(_) => VerifyResponse {
            valid: true,
            message: "Token is valid".to_string(),
        },
        Err(e) => VerifyResponse {
            valid: false,
            message: e.to_string(),
        },
    };

    Ok(Json(response))
}

/// GET /api/auth/validate/ — Authenticated token introspection.
///
/// `expires` comes from the claims the presented token actually carried,
/// not from a fresh computation.
pub async fn validate_token(
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ValidateResponse {
        valid: true,
        user: principal.username,
        expires: principal.claims.expires_at().to_rfc3339(),
    }))
}
