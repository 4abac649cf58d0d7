use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use presto_core::{CacheStats, ContentType, SanitizedConfig, StreamList};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache().stats().await)
}

/// Addon manifest.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub catalogs: Vec<String>,
    pub id_prefixes: Vec<String>,
}

pub async fn manifest() -> Json<Manifest> {
    Json(Manifest {
        id: "dev.presto.streams".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "Presto".to_string(),
        description: "Debrid-backed stream resolution".to_string(),
        resources: vec!["stream".to_string()],
        types: vec!["movie".to_string(), "series".to_string()],
        catalogs: vec![],
        id_prefixes: vec!["tt".to_string()],
    })
}

/// Stream resolution endpoint: `/stream/{type}/{id}.json`.
///
/// Always 200 with a (possibly empty) stream list; every failure mode
/// inside the pipeline degrades instead of erroring.
pub async fn stream(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
) -> Json<StreamList> {
    let content_id = id.strip_suffix(".json").unwrap_or(&id);

    let Ok(content_type) = content_type.parse::<ContentType>() else {
        debug!(content_type = %content_type, "Unsupported content type");
        return Json(StreamList::default());
    };

    Json(
        state
            .resolver()
            .resolve_streams(content_type, content_id)
            .await,
    )
}

pub async fn metrics() -> String {
    crate::metrics::encode_metrics()
}
