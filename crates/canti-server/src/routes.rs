use crate::error::ApiError;
use crate::relay::{RelayReply, RelayRequest};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::header::ALLOW,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::Instrument;

pub const RELAY_PATH: &str = "/api/canti";

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn relay_routes() -> Router<AppState> {
    Router::new().route(RELAY_PATH, post(relay).fallback(method_not_allowed))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions().len(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

async fn relay(State(state): State<AppState>, body: Bytes) -> Result<Json<RelayReply>, ApiError> {
    let request = RelayRequest::from_slice(&body)?;
    let span = tracing::info_span!(
        "relay",
        request_id = %uuid::Uuid::new_v4(),
        session_id = request.session_id,
        provider = state.relay.provider_name(),
    );
    let relay = state.relay.clone();
    async move { relay.spawn_exchange(request).await.map(Json).map_err(ApiError::from) }
        .instrument(span)
        .await
}

async fn method_not_allowed() -> impl IntoResponse {
    ([(ALLOW, "POST")], ApiError::method_not_allowed())
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
