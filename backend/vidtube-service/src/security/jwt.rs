/// JWT token generation and validation using HS256.
/// Access tokens are short-lived; refresh tokens are long-lived and are
/// additionally matched against the hash stored on the user row.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
}

/// Token pair returned to clients on login and refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

use std::sync::RwLock;

// Thread-safe storage for JWT keys loaded from configuration at startup
lazy_static! {
    static ref JWT_KEYS: RwLock<Option<JwtKeys>> = RwLock::new(None);
}

/// Initialize the signing secret and TTLs.
/// Must be called during application startup before any JWT operations.
pub fn initialize(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Result<()> {
    let mut keys = JWT_KEYS
        .write()
        .map_err(|e| AppError::Internal(format!("Failed to acquire write lock on JWT keys: {}", e)))?;

    *keys = Some(JwtKeys {
        encoding: EncodingKey::from_secret(secret.as_bytes()),
        decoding: DecodingKey::from_secret(secret.as_bytes()),
        access_ttl_secs,
        refresh_ttl_secs,
    });

    Ok(())
}

fn with_keys<T>(f: impl FnOnce(&JwtKeys) -> Result<T>) -> Result<T> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| AppError::Internal(format!("Failed to acquire read lock on JWT keys: {}", e)))?;

    match keys.as_ref() {
        Some(keys) => f(keys),
        None => Err(AppError::Internal(
            "JWT keys not initialized. Call initialize() during startup".to_string(),
        )),
    }
}

fn generate_token(user_id: Uuid, token_type: &str, ttl_secs: i64, key: &EncodingKey) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        token_type: token_type.to_string(),
    };

    encode(&Header::default(), &claims, key).map_err(AppError::from)
}

/// Generate a new access token
pub fn generate_access_token(user_id: Uuid) -> Result<String> {
    with_keys(|keys| generate_token(user_id, "access", keys.access_ttl_secs, &keys.encoding))
}

/// Generate a new refresh token
pub fn generate_refresh_token(user_id: Uuid) -> Result<String> {
    with_keys(|keys| generate_token(user_id, "refresh", keys.refresh_ttl_secs, &keys.encoding))
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(user_id: Uuid) -> Result<TokenPair> {
    let access_token = generate_access_token(user_id)?;
    let refresh_token = generate_refresh_token(user_id)?;
    let expires_in = with_keys(|keys| Ok(keys.access_ttl_secs))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in,
    })
}

/// Validate and decode a token of either type
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    with_keys(|keys| {
        decode::<Claims>(
            token,
            &keys.decoding,
            &Validation::new(jsonwebtoken::Algorithm::HS256),
        )
        .map_err(AppError::from)
    })
}

/// Extract the user id from a valid access token.
pub fn user_id_from_access_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;

    if token_data.claims.token_type != "access" {
        return Err(AppError::Authentication("Invalid access token".to_string()));
    }

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))
}

/// Extract the user id from a valid refresh token.
pub fn user_id_from_refresh_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;

    if token_data.claims.token_type != "refresh" {
        return Err(AppError::Authentication("Invalid refresh token".to_string()));
    }

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_keys() {
        initialize("test-secret-please-rotate", 900, 864000).expect("initialize keys");
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id).expect("generate token");
        assert_eq!(token.matches('.').count(), 2);

        let data = validate_token(&token).expect("validate token");
        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.token_type, "access");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_token_pair_has_both_types() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let pair = generate_token_pair(user_id).expect("generate pair");
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = validate_token(&pair.access_token).expect("access claims");
        let refresh = validate_token(&pair.refresh_token).expect("refresh claims");
        assert_eq!(access.claims.token_type, "access");
        assert_eq!(refresh.claims.token_type, "refresh");
        assert!(refresh.claims.exp > access.claims.exp);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let access = generate_access_token(user_id).expect("generate token");
        assert!(user_id_from_refresh_token(&access).is_err());
        assert_eq!(user_id_from_access_token(&access).expect("subject"), user_id);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let refresh = generate_refresh_token(user_id).expect("generate token");
        assert!(user_id_from_access_token(&refresh).is_err());
        assert_eq!(
            user_id_from_refresh_token(&refresh).expect("subject"),
            user_id
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        init_test_keys();
        assert!(validate_token("not.a.valid.token").is_err());
    }

    #[test]
    fn test_validate_corrupted_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id).expect("generate token");

        let mut corrupted = token.clone();
        corrupted.pop();
        corrupted.push('x');
        assert!(validate_token(&corrupted).is_err());
    }
}
