use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenCodec;
use crate::config::AppConfig;

/// Shared per-process resources handed to every request handler. All of
/// it is immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
    pub pool: PgPool,
}
