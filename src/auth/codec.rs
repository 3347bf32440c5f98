//! Signed token encoding and decoding.
//!
//! `TokenCodec` owns the signing secret and the configured lifetime. Tokens
//! are JWTs signed with a symmetric HMAC algorithm (HS256 by default);
//! signature verification inside `jsonwebtoken` is constant-time, so
//! comparison timing leaks nothing about the expected signature.

use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried inside every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated username.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. Always `iat + lifetime`.
    pub exp: i64,
    /// Fresh random token id. Only distinguishes tokens; nothing consumes it
    /// (no replay cache, no revocation list).
    pub jti: String,
}

impl Claims {
    /// Expiry as a UTC datetime, for response formatting.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

/// A freshly issued token together with the claims that were signed into it.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

/// Token codec failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Invalid token")]
    Malformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Encodes and verifies signed tokens.
///
/// Holds the process-wide signing secret as explicit state injected at
/// construction. Read-only after startup; safe to share behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    lifetime_secs: u64,
}

impl TokenCodec {
    /// Create a codec from the configured secret, algorithm, and lifetime.
    ///
    /// Fails with `MissingSecret` if the secret is empty; this is the
    /// startup configuration check, there is no later failure path for
    /// signing.
    pub fn new(secret: &str, algorithm: Algorithm, lifetime_secs: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(algorithm);
        // No grace window: a token is dead the moment `exp` passes.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(TokenCodec {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            lifetime_secs,
        })
    }

    /// Issue a signed token for `subject`, expiring after the configured
    /// lifetime.
    pub fn encode(&self, subject: &str) -> Result<SignedToken, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.lifetime_secs as i64,
            jti: nanoid::nanoid!(),
        };

        let token = jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(SignedToken { token, claims })
    }

    /// Verify a token string and return its claims.
    ///
    /// Pure function of (token, current time, secret): checks the
    /// header/payload/signature structure, then the signature, then expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed,
            })
    }
}
