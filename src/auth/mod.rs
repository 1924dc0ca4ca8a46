pub mod gate;
pub mod password;
pub mod token;

pub use gate::{require_permission, require_self};
pub use password::{generate_salt, hash_password, verify_password};
pub use token::{Claims, TokenCodec};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission level carried by a credential and echoed in token claims.
/// Serialized with the wire names the database stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionLevel {
    #[serde(rename = "regularUser")]
    RegularUser,
    #[serde(rename = "admin")]
    Admin,
}

impl PermissionLevel {
    /// True when `self` satisfies a requirement of `required`.
    /// Admin satisfies everything; regular users only regular requirements.
    pub fn satisfies(self, required: PermissionLevel) -> bool {
        match (self, required) {
            (PermissionLevel::Admin, _) => true,
            (PermissionLevel::RegularUser, PermissionLevel::RegularUser) => true,
            (PermissionLevel::RegularUser, PermissionLevel::Admin) => false,
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionLevel::RegularUser => write!(f, "regularUser"),
            PermissionLevel::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Access denied")]
    Forbidden,

    #[error("Token secret is not configured")]
    MissingSecret,
}
