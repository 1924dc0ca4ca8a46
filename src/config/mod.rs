use serde::{Deserialize, Serialize};
use std::env;

/// Immutable process configuration. Built once in `main` and passed by
/// reference (via the axum state) to every component that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC secret for token signing. Must be non-empty.
    pub token_secret: String,
    /// Token validity window in seconds.
    pub token_ttl_secs: i64,
}

/// Default token lifetime: 5 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 300;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                token_secret: String::new(),
                token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("TOKEN_SECRET") {
            self.security.token_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_ttl_is_five_minutes() {
        let config = AppConfig::defaults();
        assert_eq!(config.security.token_ttl_secs, 300);
    }

    #[test]
    fn test_defaults_leave_secret_empty() {
        let config = AppConfig::defaults();
        assert!(config.security.token_secret.is_empty());
        assert_eq!(config.server.port, 3000);
    }
}
