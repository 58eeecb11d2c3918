use crate::{
    config::Config,
    errors::{into_response, AppError, AppResult},
    resolver::ResourceRoot,
};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{io::Read, sync::Arc, time::Instant};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub root: Arc<ResourceRoot>,
}

pub async fn serve(cfg: Config, root: ResourceRoot) -> anyhow::Result<()> {
    let shared = AppState { cfg: Arc::new(cfg), root: Arc::new(root) };

    let addr: std::net::SocketAddr =
        format!("{}:{}", shared.cfg.server.bind_addr, shared.cfg.server.port)
            .parse()
            .context("parsing bind address")?;
    let app = build_router(shared);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(shared: AppState) -> Router {
    let base = shared.cfg.server.base_path.trim_end_matches('/').to_string();
    Router::new()
        .route("/healthz", get(health))
        .route(&format!("{base}/resources/*name"), get(resource))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok"})))
}

async fn resource(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let root = state.root.clone();
    let limit = state.cfg.limits.max_resource_kb * 1024;
    let lookup = name.clone();

    let result = tokio::task::spawn_blocking(move || read_resource(&root, &lookup, limit))
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(e.to_string())));

    match result {
        Ok(bytes) => {
            audit(&request_id, &name, "OK", started.elapsed().as_millis() as u64, bytes.len());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            audit(&request_id, &name, e.code(), started.elapsed().as_millis() as u64, 0);
            into_response(e).into_response()
        }
    }
}

fn read_resource(root: &ResourceRoot, name: &str, limit: usize) -> AppResult<Vec<u8>> {
    let file = root.open(name)?;
    let len = file.metadata().map_err(|e| AppError::Internal(e.to_string()))?.len();
    if len > limit as u64 {
        return Err(AppError::TooLarge);
    }
    let mut buf = Vec::with_capacity(len as usize);
    // the file may grow between stat and read
    file.take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if buf.len() > limit {
        return Err(AppError::TooLarge);
    }
    Ok(buf)
}

fn audit(request_id: &str, name: &str, code: &str, duration_ms: u64, bytes_out: usize) {
    tracing::info!(
        request_id = request_id,
        name = name,
        code = code,
        duration_ms = duration_ms,
        bytes_out = bytes_out,
        "audit"
    );
}
