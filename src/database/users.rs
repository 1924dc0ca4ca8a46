use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::manager::DatabaseError;
use crate::auth::password::{generate_salt, hash_password};
use crate::auth::PermissionLevel;

/// Stored credential row. Ownership stays with the database; this is a
/// transient copy held only for the duration of one verification or
/// update operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCredential {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub permissions: String,
}

impl UserCredential {
    pub fn permission_level(&self) -> PermissionLevel {
        match self.permissions.as_str() {
            "admin" => PermissionLevel::Admin,
            _ => PermissionLevel::RegularUser,
        }
    }

    /// Merge a partial edit into this credential. A supplied password
    /// rotates the salt and re-derives the digest; absent fields keep
    /// their stored values, including hash and salt.
    pub fn with_changes(&self, changes: &CredentialChanges) -> UserCredential {
        let mut updated = self.clone();
        if let Some(username) = &changes.username {
            updated.username = username.clone();
        }
        if let Some(email) = &changes.email {
            updated.email = email.clone();
        }
        if let Some(password) = &changes.password {
            updated.salt = generate_salt();
            updated.password_hash = hash_password(password, &updated.salt);
        }
        updated
    }
}

/// Partial edit to an existing credential. `None` means "keep as stored".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A credential ready for insertion. The digest is derived up front by
/// the factory; construction itself performs no hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub permissions: PermissionLevel,
}

impl NewUser {
    /// Derive a fresh salt and digest for a plaintext password and return
    /// a fully-formed value. New users start as regular users.
    pub fn from_plaintext(username: String, email: String, password: &str) -> Self {
        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        Self {
            username,
            email,
            password_hash,
            salt,
            permissions: PermissionLevel::RegularUser,
        }
    }
}

const CREDENTIAL_COLUMNS: &str = "id, username, email, password_hash, salt, permissions";

/// Look up a credential by username or email; the login field accepts
/// either.
pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<UserCredential, DatabaseError> {
    let query = format!(
        "SELECT {} FROM users WHERE username = $1 OR email = $1",
        CREDENTIAL_COLUMNS
    );
    sqlx::query_as::<_, UserCredential>(&query)
        .bind(login)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user '{}'", login)))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<UserCredential, DatabaseError> {
    let query = format!("SELECT {} FROM users WHERE id = $1", CREDENTIAL_COLUMNS);
    sqlx::query_as::<_, UserCredential>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user id {}", id)))
}

pub async fn insert(pool: &PgPool, user: &NewUser) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, salt, permissions) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.salt)
    .bind(user.permissions.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &PgPool, user: &UserCredential) -> Result<(), DatabaseError> {
    sqlx::query(
        "UPDATE users SET username = $1, email = $2, password_hash = $3, salt = $4 \
         WHERE id = $5",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.salt)
    .bind(user.id)
    .execute(pool)
    .await?;
    Ok(())
}
