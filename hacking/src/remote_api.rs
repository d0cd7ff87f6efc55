use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::action::HackAction;
use crate::difficulty::{PresetCatalog, preset_catalog};
use crate::driver::{ActionReport, SessionHandle};
use crate::error::DriverError;
use crate::projection::HackSnapshot;

pub const DEFAULT_API_ADDR: &str = "127.0.0.1:4100";

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Clone)]
struct ApiState {
    session: SessionHandle,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn unavailable(err: DriverError) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
}

async fn health() -> &'static str {
    "ok"
}

async fn presets() -> Json<PresetCatalog> {
    Json(preset_catalog())
}

async fn session_state(State(state): State<ApiState>) -> ApiResult<HackSnapshot> {
    let snapshot = state.session.state().await.map_err(unavailable)?;
    Ok(Json(snapshot))
}

async fn session_action(
    State(state): State<ApiState>,
    Json(action): Json<HackAction>,
) -> ApiResult<ActionReport> {
    let report = state.session.apply(action).await.map_err(unavailable)?;
    Ok(Json(report))
}

async fn session_command(
    State(state): State<ApiState>,
    Json(payload): Json<CommandRequest>,
) -> ApiResult<ActionReport> {
    let action = HackAction::parse(&payload.command)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    let report = state.session.apply(action).await.map_err(unavailable)?;
    Ok(Json(report))
}

pub fn router(session: SessionHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/presets", get(presets))
        .route("/api/session/state", get(session_state))
        .route("/api/session/action", post(session_action))
        .route("/api/session/command", post(session_command))
        .with_state(ApiState { session })
        .layer(cors)
}

pub fn resolve_api_addr<F>(mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = get_env("HACKING_API_ADDR").and_then(|v| v.parse().ok()) {
        return addr;
    }

    if let Some(port) = get_env("HACKING_API_PORT").and_then(|v| v.parse::<u16>().ok()) {
        return SocketAddr::from(([127, 0, 0, 1], port));
    }

    SocketAddr::from(([127, 0, 0, 1], 4100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_addr_defaults_to_4100() {
        let addr = resolve_api_addr(|_| None);
        assert_eq!(addr, DEFAULT_API_ADDR.parse().unwrap());
    }

    #[test]
    fn resolve_api_addr_prefers_explicit_addr() {
        let addr = resolve_api_addr(|k| match k {
            "HACKING_API_ADDR" => Some("127.0.0.1:4555".to_string()),
            "HACKING_API_PORT" => Some("4556".to_string()),
            _ => None,
        });
        assert_eq!(addr, "127.0.0.1:4555".parse().unwrap());
    }

    #[test]
    fn resolve_api_addr_accepts_port_env() {
        let addr = resolve_api_addr(|k| (k == "HACKING_API_PORT").then(|| "4601".to_string()));
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 4601)));
    }

    #[test]
    fn resolve_api_addr_ignores_invalid_addr_but_uses_valid_port() {
        let addr = resolve_api_addr(|k| match k {
            "HACKING_API_ADDR" => Some("not-an-addr".to_string()),
            "HACKING_API_PORT" => Some("4557".to_string()),
            _ => None,
        });
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 4557)));
    }
}
