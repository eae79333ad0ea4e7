use anyhow::{Context, Result};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State};
use tracing::{info, warn};

use symlog_types::api::{Credentials, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;
use crate::{AppState, JsonBody, json_body, run_db};

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// `Ok(false)` on mismatch; `Err` only if the stored hash is unreadable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn required(creds: &impl Credentials) -> Result<(String, String), ApiError> {
    let (username, password) = creds.credentials();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("username and password required"));
    }
    Ok((username, password))
}

/// POST /api/community/register
pub async fn register(
    State(state): State<AppState>,
    payload: JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (username, password) = required(&json_body(payload)?)?;

    let name = username.clone();
    let user_id = run_db(&state, move |db| {
        if db.get_user_by_username(&name)?.is_some() {
            return Ok(None);
        }
        let password_hash = hash_password(&password)?;
        db.create_user(&name, &password_hash)
    })
    .await?
    .ok_or(ApiError::Conflict("username taken"))?;

    info!(user_id, %username, "User registered");
    Ok(Json(RegisterResponse {
        success: true,
        user_id,
    }))
}

/// POST /api/community/login — checks the password and returns the user id.
/// No session or token is issued.
pub async fn login(
    State(state): State<AppState>,
    payload: JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = required(&json_body(payload)?)?;

    let name = username.clone();
    let user_id = run_db(&state, move |db| {
        let Some(user) = db.get_user_by_username(&name)? else {
            return Ok(None);
        };
        let valid = verify_password(&password, &user.password_hash)
            .with_context(|| format!("Stored hash for user {} is unreadable", user.id))?;
        Ok(valid.then_some(user.id))
    })
    .await?;

    let Some(user_id) = user_id else {
        warn!(%username, "Failed login");
        return Err(ApiError::Auth("invalid credentials"));
    };

    Ok(Json(LoginResponse {
        success: true,
        user_id,
        username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }
}
