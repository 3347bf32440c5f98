//! User directory Redis operations.
//!
//! Redis key pattern:
//! - `user:{username}` — individual user data (JSON)
//!
//! Stored documents carry Argon2 password hashes; JSON blobs read back from
//! Redis are wrapped in `zeroize::Zeroizing` so hash material is cleared
//! from memory after deserialization.

use crate::models::StoredUser;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Store a user in Redis (no TTL; directory entries are permanent).
pub async fn store_user<C>(con: &mut C, user: &StoredUser) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", user.username);
    let json = serde_json::to_string(user).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })?;

    con.set::<_, _, ()>(&key, json).await?;
    Ok(())
}

/// Get a user by username.
///
/// The user JSON is zeroized after deserialization.
pub async fn get_user<C>(
    con: &mut C,
    username: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", username);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            // zeroizing_data is automatically zeroized when dropped here
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Upsert the admin user from startup configuration.
///
/// The plaintext password from the environment is hashed here; only the
/// Argon2 hash ever reaches Redis.
pub async fn upsert_admin<C>(
    con: &mut C,
    username: &str,
    password: &str,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let password_hash = crate::auth::password::hash_password(password).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "Password hash",
            e.to_string(),
        ))
    })?;

    let user = StoredUser {
        username: username.to_string(),
        password_hash,
        created_at: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    };

    store_user(con, &user).await
}
