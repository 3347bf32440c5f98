use jsonwebtoken::Algorithm;
use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Token signing
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_lifetime_secs: u64,

    // Admin identity (seeded into the user directory at startup)
    pub admin_username: String,
    pub admin_password: String,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // Rate limiting
    pub rate_limit_login_per_min: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("rate_limit_login_per_min", &self.rate_limit_login_per_min)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Signing secret — required; a gateway without one cannot issue or
        // verify anything, so this is the fatal startup check.
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let algorithm_str = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let jwt_algorithm = parse_algorithm(&algorithm_str)?;

        let token_lifetime_secs = parse_env_or_default("TOKEN_LIFETIME_SECS", 3_600)?;
        if token_lifetime_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_LIFETIME_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        // Validate ADMIN_USERNAME: 2-64 chars, alphanumeric + hyphen + underscore
        if admin_username.len() < 2 || admin_username.len() > 64 {
            return Err(ConfigError::InvalidValue(
                "ADMIN_USERNAME".to_string(),
                "must be 2-64 characters".to_string(),
            ));
        }
        if !admin_username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue(
                "ADMIN_USERNAME".to_string(),
                "may only contain alphanumeric characters, hyphens, and underscores".to_string(),
            ));
        }

        let admin_password = env::var("ADMIN_PASSWORD")
            .map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD".to_string()))?;
        if admin_password.is_empty() {
            return Err(ConfigError::InvalidValue(
                "ADMIN_PASSWORD".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Rate limiting
        let rate_limit_login_per_min = parse_env_or_default("RATE_LIMIT_LOGIN_PER_MIN", 5)?;

        Ok(Config {
            jwt_secret,
            jwt_algorithm,
            token_lifetime_secs,
            admin_username,
            admin_password,
            redis_url,
            bind_addr,
            rate_limit_login_per_min,
        })
    }
}

/// Parse the signing algorithm tag. Symmetric HMAC variants only.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::InvalidValue(
            "JWT_ALGORITHM".to_string(),
            format!("unsupported algorithm: {}", other),
        )),
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
