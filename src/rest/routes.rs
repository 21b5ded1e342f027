use crate::config::Config;
use crate::dataset;
use crate::flight::Flight;
use crate::query::{self, DelayStats, SlotCounts};
use crate::rest::error::Error;
use crate::schedule::schedule::{CascadeRecord, Schedule};
use crate::schedule::shift::{ShiftParams, ShiftSuggestion};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
}

impl ServerState {
    /// Re-reads the dataset; nothing is cached between requests.
    async fn flights(&self) -> Result<Vec<Flight>, Error> {
        let path = self.config.dataset_path.clone();
        Ok(tokio::task::spawn_blocking(move || dataset::load_flights(&path)).await??)
    }

    async fn schedule(&self) -> Result<Schedule, Error> {
        Ok(Schedule::new(self.flights().await?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SlotParams {
    pub hour_bucket: u32,
    pub top: usize,
}

impl Default for SlotParams {
    fn default() -> Self {
        Self {
            hour_bucket: 1,
            top: 12,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CascadeParams {
    pub window_min: Option<u32>,
    pub top: usize,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            window_min: None,
            top: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: String,
    pub limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            limit: 50,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeParams {
    pub max_shift: Option<i64>,
    pub step: Option<i64>,
    pub window_min: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub path: String,
}

pub async fn index(State(state): State<ServerState>) -> Result<impl IntoResponse, Error> {
    let path = &state.config.index_path;
    let page = tokio::fs::read_to_string(path)
        .await
        .map_err(|cause| Error::IO {
            message: format!("failed to read {}", path.display()),
            cause,
        })?;
    Ok(Html(page))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn busiest_slots(
    State(state): State<ServerState>,
    Query(params): Query<SlotParams>,
) -> Result<Json<SlotCounts>, Error> {
    if params.hour_bucket == 0 {
        return Err(Error::BadRequest("hour_bucket must be at least 1".to_string()));
    }
    let flights = state.flights().await?;
    Ok(Json(query::busiest_slots(
        &flights,
        params.hour_bucket,
        params.top,
    )))
}

pub async fn delay_stats(State(state): State<ServerState>) -> Result<Json<DelayStats>, Error> {
    let flights = state.flights().await?;
    Ok(Json(query::delay_stats(
        &flights,
        state.config.delayed_threshold_min,
    )))
}

pub async fn top_cascade_flights(
    State(state): State<ServerState>,
    Query(params): Query<CascadeParams>,
) -> Result<Json<Vec<CascadeRecord>>, Error> {
    let window = params.window_min.unwrap_or(state.config.cascade.window_min);
    let schedule = state.schedule().await?;
    let records = schedule
        .top_cascade(i64::from(window), params.top)
        .iter()
        .map(CascadeRecord::from)
        .collect();
    Ok(Json(records))
}

pub async fn search_flights(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Flight>>, Error> {
    let flights = state.flights().await?;
    let found = query::search_flights(&flights, &params.q, params.limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(found))
}

pub async fn optimize_schedule(
    State(state): State<ServerState>,
    Query(params): Query<OptimizeParams>,
) -> Result<Json<ShiftSuggestion>, Error> {
    let defaults = state.config.cascade.shift_params();
    let shift = ShiftParams {
        window: params.window_min.map_or(defaults.window, i64::from),
        max_shift: params.max_shift.unwrap_or(defaults.max_shift),
        step: params.step.unwrap_or(defaults.step),
    };
    shift.validate().map_err(|e| Error::BadRequest(e.to_string()))?;
    let schedule = state.schedule().await?;
    schedule
        .suggest_shift(shift)
        .map(Json)
        .ok_or_else(|| Error::NotFound("no flights in dataset".to_string()))
}

pub async fn upload_csv(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Error> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            upload = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| Error::BadRequest(e.to_string()))?,
            );
            break;
        }
    }
    let bytes = upload.ok_or_else(|| Error::BadRequest("missing multipart field 'file'".to_string()))?;
    let path = save_upload(&bytes, &state.config.upload_path).await?;
    Ok(Json(UploadResponse {
        status: "saved",
        path: path.display().to_string(),
    }))
}

/// Writes the upload verbatim once it parses as a complete flight dataset.
/// Rejected uploads leave the filesystem untouched.
async fn save_upload(bytes: &Bytes, path: &Path) -> Result<PathBuf, Error> {
    let flights = dataset::read_flights(&bytes[..]).map_err(|e| Error::BadRequest(e.to_string()))?;
    if flights.is_empty() {
        return Err(Error::BadRequest("upload contains no flights".to_string()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|cause| Error::IO {
                message: format!("failed to create {}", parent.display()),
                cause,
            })?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|cause| Error::IO {
            message: format!("failed to write {}", path.display()),
            cause,
        })?;
    info!("saved {} uploaded flights to {}", flights.len(), path.display());
    Ok(path.to_path_buf())
}
