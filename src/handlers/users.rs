use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{require_permission, require_self, Claims, PermissionLevel};
use crate::database::users::{self, CredentialChanges, NewUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_email, validate_password, validate_username};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /api/users - register a new user. Admin only; new accounts start
/// as regular users.
pub async fn user_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&claims, PermissionLevel::Admin)?;

    validate_username(&body.username)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let user = NewUser::from_plaintext(body.username, body.email, &body.password);
    users::insert(&state.pool, &user).await?;

    Ok(Json(json!({"success": true, "message": "User added successfully"})))
}

/// PUT /api/users/:id - partial edit, scoped to the token's own subject.
/// Absent fields keep old values; a supplied password rotates the salt.
pub async fn user_put(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(changes): Json<CredentialChanges>,
) -> Result<Json<Value>, ApiError> {
    require_self(&claims, id)?;

    if let Some(username) = &changes.username {
        validate_username(username)?;
    }
    if let Some(email) = &changes.email {
        validate_email(email)?;
    }
    if let Some(password) = &changes.password {
        validate_password(password)?;
    }

    let stored = users::find_by_id(&state.pool, id).await?;
    let updated = stored.with_changes(&changes);
    users::update(&state.pool, &updated).await?;

    Ok(Json(json!({"success": true, "message": "Data updated successfully"})))
}
