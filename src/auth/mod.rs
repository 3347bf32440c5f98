//! Token lifecycle engine: issuance, verification, and request-identity
//! resolution.

pub mod authenticator;
pub mod codec;
pub mod password;

pub use authenticator::{
    check_rate_limit, AppState, AuthError, AuthPrincipal, Authenticator, BearerAuthenticator,
    Principal,
};
pub use codec::{Claims, SignedToken, TokenCodec, TokenError};
pub use password::{hash_password, verify_password};
