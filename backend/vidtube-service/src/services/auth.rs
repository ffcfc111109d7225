/// Credential and session manager: registration, login, refresh-token
/// rotation, logout and password changes.
///
/// Access tokens are never persisted (signature + expiry only). Refresh
/// tokens are stored as a SHA-256 hash on the user row and rotated on every
/// successful refresh; a replayed or raced token fails the stored-hash
/// comparison.
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::security::{jwt, password};
use crate::models::User;

pub struct AuthService {
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the account row. Uniqueness is checked up front for a clean
    /// 409; the store's unique indexes are the actual guarantee.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        plain_password: &str,
        avatar_url: &str,
        cover_url: Option<&str>,
    ) -> Result<User> {
        if user_repo::username_or_email_exists(&self.db, username, email).await? {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let password_hash = password::hash_password(plain_password)?;

        let user = user_repo::create_user(
            &self.db,
            username,
            email,
            full_name,
            &password_hash,
            avatar_url,
            cover_url,
        )
        .await?;

        tracing::info!("User registered: {}", user.username);

        Ok(user)
    }

    /// Verify credentials and issue a fresh token pair.
    pub async fn login(&self, identifier: &str, plain_password: &str) -> Result<(User, jwt::TokenPair)> {
        let user = user_repo::find_by_identifier(&self.db, identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        let valid = password::verify_password(plain_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::Authentication(
                "Invalid user credentials".to_string(),
            ));
        }

        let tokens = self.issue_tokens(user.id).await?;

        tracing::info!("User logged in: {}", user.username);

        Ok((user, tokens))
    }

    /// Rotate the refresh token. Verification order: signature/expiry first,
    /// then user existence, then an atomic compare-and-swap against the
    /// stored hash so a concurrent refresh cannot keep a stale token valid.
    pub async fn refresh(&self, incoming_refresh_token: &str) -> Result<jwt::TokenPair> {
        if incoming_refresh_token.is_empty() {
            return Err(AppError::Authentication("Unauthorized request".to_string()));
        }

        let user_id = jwt::user_id_from_refresh_token(incoming_refresh_token)
            .map_err(|_| AppError::Authentication("Invalid refresh token".to_string()))?;

        let user = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid refresh token".to_string()))?;

        let incoming_hash = sha256_hex(incoming_refresh_token);
        if user.refresh_token_hash.as_deref() != Some(incoming_hash.as_str()) {
            return Err(AppError::Authentication(
                "Refresh token is expired or used".to_string(),
            ));
        }

        let tokens = jwt::generate_token_pair(user.id)?;
        let new_hash = sha256_hex(&tokens.refresh_token);

        let rotated =
            user_repo::rotate_refresh_token(&self.db, user.id, &incoming_hash, &new_hash).await?;
        if !rotated {
            // Someone else rotated between our read and the swap.
            return Err(AppError::Authentication(
                "Refresh token is expired or used".to_string(),
            ));
        }

        tracing::info!("Token refreshed for user: {}", user.id);

        Ok(tokens)
    }

    /// Drop the stored refresh token so the outstanding one stops working.
    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        user_repo::set_refresh_token(&self.db, user_id, None).await?;
        tracing::info!("User logged out: {}", user_id);
        Ok(())
    }

    /// Re-hash and persist a new password after verifying the old one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        let valid = password::verify_password(old_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::Authentication("Invalid old password".to_string()));
        }

        let new_hash = password::hash_password(new_password)?;
        user_repo::update_password(&self.db, user_id, &new_hash).await?;

        tracing::info!("Password changed for user: {}", user_id);

        Ok(())
    }

    /// Issue a token pair and persist the refresh-token hash.
    pub async fn issue_tokens(&self, user_id: Uuid) -> Result<jwt::TokenPair> {
        let tokens = jwt::generate_token_pair(user_id)?;
        let refresh_hash = sha256_hex(&tokens.refresh_token);
        user_repo::set_refresh_token(&self.db, user_id, Some(&refresh_hash)).await?;
        Ok(tokens)
    }
}

pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_is_stable() {
        assert_eq!(sha256_hex("token"), sha256_hex("token"));
        assert_ne!(sha256_hex("token"), sha256_hex("token2"));
        // 32 bytes hex-encoded
        assert_eq!(sha256_hex("token").len(), 64);
    }
}
