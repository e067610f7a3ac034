//! Axum HTTP transport: the single graph-operation endpoint plus the
//! health endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kith_graph::GraphClient;

use crate::config::ApiConfig;
use crate::ops::{dispatch, OpResponse, Operation};

/// Shared state: the graph client, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub client: GraphClient,
}

/// Build the router: `POST /graph` for operations, `GET /health` for
/// liveness.
pub fn router(client: GraphClient, config: &ApiConfig) -> Router {
    // Allow any origin when none are configured (local dev), otherwise
    // restrict to the configured list.
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/graph", post(handle_graph))
        .route("/health", get(handle_health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(AppState { client })
}

/// Bind and serve until the process exits.
pub async fn serve(client: GraphClient, config: &ApiConfig) -> anyhow::Result<()> {
    let app = router(client, config);
    let addr = config.listen_addr();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Handle one graph operation. Malformed JSON is the only 400; every
/// executed operation answers 200 with either `data` or `errors`.
async fn handle_graph(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let op: Operation = match serde_json::from_slice(&body) {
        Ok(op) => op,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "errors": [{"message": format!("Invalid request: {e}"), "code": "BAD_REQUEST"}]
                })),
            )
                .into_response();
        }
    };

    match dispatch(&state.client, op).await {
        Ok(data) => (StatusCode::OK, Json(OpResponse::data(data))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Operation failed");
            (StatusCode::OK, Json(OpResponse::error(&e))).into_response()
        }
    }
}

/// Health payload. Always served with HTTP 200; a database failure
/// shows up as `database: false` and status "degraded", never as an
/// error status.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: bool,
}

impl HealthStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            database: true,
        }
    }

    fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            database: false,
        }
    }
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthStatus> {
    match state.client.verify_connectivity().await {
        Ok(()) => Json(HealthStatus::healthy()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed to reach Neo4j");
            Json(HealthStatus::degraded())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_shape() {
        let healthy = serde_json::to_value(HealthStatus::healthy()).unwrap();
        assert_eq!(healthy["status"], "healthy");
        assert_eq!(healthy["database"], true);

        let degraded = serde_json::to_value(HealthStatus::degraded()).unwrap();
        assert_eq!(degraded["status"], "degraded");
        assert_eq!(degraded["database"], false);
    }
}
