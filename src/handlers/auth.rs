use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{generate_salt, hash_password, verify_password};
use crate::auth::AuthError;
use crate::database::{users, DatabaseError};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: String,
    pub password: String,
}

/// POST /api/auth - verify credentials and issue a short-lived token.
///
/// A missing user and a wrong password both answer with the same
/// message, so the endpoint does not reveal which usernames exist.
pub async fn login_post(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = users::find_by_login(&state.pool, &body.username)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound(_) => ApiError::from(AuthError::InvalidCredentials),
            other => other.into(),
        })?;

    if !verify_password(&body.password, &user.salt, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.codec.issue(user.id, user.permission_level())?;
    let ttl_minutes = state.config.security.token_ttl_secs / 60;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "message": format!("Token valid {} minutes", ttl_minutes),
    })))
}

#[derive(Debug, Deserialize)]
pub struct DigestRequest {
    pub message: String,
}

/// POST /api/digest - hash a message with a fresh salt. Demonstrates the
/// digest scheme without touching any stored credential.
pub async fn digest_post(Json(body): Json<DigestRequest>) -> Json<Value> {
    let salt = generate_salt();
    Json(json!({
        "result": hash_password(&body.message, &salt),
        "salt": salt,
    }))
}
