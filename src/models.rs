//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent Redis data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Credentials for token issuance.
///
/// Fields default to empty so that missing keys surface as the contract's
/// 400 "required" error instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response after successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// RFC 3339 expiry of the issued token.
    pub expires: String,
}

/// Request to verify a token presented in the body.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}

/// Verification outcome. Always delivered with a 200 status; validity is
/// reported in the body.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

/// Authenticated introspection result.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub user: String,
    /// RFC 3339 expiry re-derived from the presented token's claims.
    pub expires: String,
}

// ============================================================================
// Storage Models
// ============================================================================

/// User data as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    pub created_at: u64,
}
