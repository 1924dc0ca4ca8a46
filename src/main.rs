use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use atlas_api::auth::TokenCodec;
use atlas_api::config::AppConfig;
use atlas_api::database;
use atlas_api::handlers::{auth, locations, users};
use atlas_api::middleware::token_auth_middleware;
use atlas_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(AppConfig::from_env());
    let codec = Arc::new(TokenCodec::new(&config.security)?);
    let pool = database::connect(&config.database).await?;

    let state = AppState { config: config.clone(), codec, pool };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("atlas-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    // Everything past the middleware sees a verified claim extension.
    let protected = Router::new()
        .route("/api/users", post(users::user_post))
        .route("/api/users/:id", put(users::user_put))
        .route("/api/locations", get(locations::locations_get))
        .route("/api/locations/count", get(locations::locations_count))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        // Public: token acquisition, digest demo, filter introspection
        .route("/api/auth", post(auth::login_post))
        .route("/api/digest", post(auth::digest_post))
        .route("/api/query/locations", get(locations::filter_get))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": {"status": "ok", "timestamp": now, "database": "ok"}
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(json!({
                    "success": false,
                    "data": {"status": "degraded", "timestamp": now}
                })),
            )
        }
    }
}
