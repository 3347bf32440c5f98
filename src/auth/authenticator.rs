//! Request-identity resolution and Axum integration.

use crate::auth::codec::{Claims, TokenCodec};
use crate::config::Config;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use redis::AsyncCommands;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub codec: Arc<TokenCodec>,
    pub authenticator: Arc<dyn Authenticator>,
}

/// The authenticated subject resolved from a request token.
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
    /// The claims the token actually carried; `expires` in responses is
    /// re-derived from these, never recomputed.
    pub claims: Claims,
}

/// Authenticator failures.
///
/// Decode failures are collapsed to `Failed`: the specific kind is logged
/// server-side but never distinguishes expired from tampered on the wire.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid authorization header format")]
    MalformedCredential,

    #[error("Authentication failed")]
    Failed,
}

/// Resolves an `Authorization` header value into a principal.
///
/// `Ok(None)` means no credential was supplied; the request layer decides
/// whether anonymous access is acceptable for the endpoint.
pub trait Authenticator: Send + Sync {
    fn resolve(&self, header: Option<&str>) -> Result<Option<Principal>, AuthError>;
}

/// `Bearer <token>` authenticator over the token codec.
///
/// Trust is placed entirely in the signature and expiry: no directory
/// lookup confirms the subject still exists. That stateless contract is
/// deliberate.
pub struct BearerAuthenticator {
    codec: Arc<TokenCodec>,
}

impl BearerAuthenticator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        BearerAuthenticator { codec }
    }
}

impl Authenticator for BearerAuthenticator {
    fn resolve(&self, header: Option<&str>) -> Result<Option<Principal>, AuthError> {
        // No credential is not an error; the caller treats it as anonymous.
        let Some(value) = header else {
            return Ok(None);
        };

        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedCredential)?;

        match self.codec.decode(token) {
            Ok(claims) => Ok(Some(Principal {
                username: claims.sub.clone(),
                claims,
            })),
            Err(e) => {
                // Log the kind, return the collapsed category.
                tracing::warn!(action = "token_rejected", error = %e, "Token failed verification");
                Err(AuthError::Failed)
            }
        }
    }
}

/// Authenticated-principal extractor.
///
/// Extracts a principal from `Authorization: Bearer {token}`.
/// Returns 401 Unauthorized if the header is missing or the token invalid.
pub struct AuthPrincipal(pub Principal);

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        match state.authenticator.resolve(header)? {
            Some(principal) => Ok(AuthPrincipal(principal)),
            None => Err(AppError::Unauthorized(
                "Authorization header is required".to_string(),
            )),
        }
    }
}

/// Check rate limit using Redis INCR with TTL.
///
/// # Returns
/// * `Ok(true)` if under limit
/// * `Ok(false)` if limit exceeded
pub async fn check_rate_limit<C>(
    con: &mut C,
    key: &str,
    max: u32,
    window_secs: u64,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let count: u32 = con.incr(key, 1).await?;

    // Set TTL on first request
    if count == 1 {
        con.expire::<_, ()>(key, window_secs as i64).await?;
    }

    Ok(count <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    const SECRET: &str = "authenticator-test-secret-32-bytes!!";

    fn authenticator() -> (Arc<TokenCodec>, BearerAuthenticator) {
        let codec = Arc::new(TokenCodec::new(SECRET, Algorithm::HS256, 3600).unwrap());
        (codec.clone(), BearerAuthenticator::new(codec))
    }

    #[test]
    fn test_absent_header_is_anonymous() {
        let (_, auth) = authenticator();
        let result = auth.resolve(None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_non_bearer_scheme_is_malformed() {
        let (_, auth) = authenticator();
        for header in ["Basic dXNlcjpwYXNz", "Token abc123", "bearer nope"] {
            let result = auth.resolve(Some(header));
            assert!(
                matches!(result, Err(AuthError::MalformedCredential)),
                "expected MalformedCredential for {:?}",
                header
            );
        }
    }

    #[test]
    fn test_invalid_token_collapses_to_failed() {
        let (_, auth) = authenticator();
        let result = auth.resolve(Some("Bearer invalid_token"));
        assert!(matches!(result, Err(AuthError::Failed)));
    }

    #[test]
    fn test_wrong_key_collapses_to_failed() {
        let other = TokenCodec::new("a-different-secret-32-bytes-long!!!!", Algorithm::HS256, 3600)
            .unwrap();
        let issued = other.encode("alice").unwrap();

        let (_, auth) = authenticator();
        let result = auth.resolve(Some(&format!("Bearer {}", issued.token)));
        assert!(matches!(result, Err(AuthError::Failed)));
    }

    #[test]
    fn test_valid_token_resolves_principal() {
        let (codec, auth) = authenticator();
        let issued = codec.encode("alice").unwrap();

        let principal = auth
            .resolve(Some(&format!("Bearer {}", issued.token)))
            .unwrap()
            .unwrap();

        assert_eq!(principal.username, "alice");
        assert_eq!(principal.claims.exp, issued.claims.exp);
        assert_eq!(principal.claims.jti, issued.claims.jti);
    }
}
