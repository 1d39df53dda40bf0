use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{SheetCategory, WorkbookAnalysis},
    services::{
        excel::ExcelAnalyzer,
        filter::{FilteredSummary, RecordFilter},
        upload::{validate_upload, UploadedFile},
    },
};
use tower_http::cors::{CorsLayer, Any};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

const NO_WORKBOOK_MESSAGE: &str = "No workbook data available. Please upload a file first.";

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/api/upload", post(upload_workbook))
        .route("/api/workbook", get(get_workbook).delete(clear_workbook))
        .route("/api/workbook/summary", get(workbook_summary))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD)))
        .layer(cors)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    total_count: usize,
    active_count: usize,
    removed_count: usize,
    sheets_found: SmallVec<[SheetCategory; 4]>,
}

impl From<&WorkbookAnalysis> for UploadSummary {
    fn from(analysis: &WorkbookAnalysis) -> Self {
        Self {
            total_count: analysis.total_count,
            active_count: analysis.active_count,
            removed_count: analysis.removed_count,
            sheets_found: analysis
                .sheets
                .iter()
                .filter(|sheet| sheet.total_count > 0)
                .map(|sheet| sheet.category)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    success: bool,
    message: String,
    summary: UploadSummary,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    success: bool,
    message: String,
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::InvalidInput(err.body_text())
    }
}

async fn read_file_field(multipart: &mut Multipart, limit: usize) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(AppError::InvalidInput("No file uploaded".to_string()))
}

async fn upload_workbook(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let start = std::time::Instant::now();
    let max_file_size = state.config.max_file_size;

    let mut multipart = multipart.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let upload = read_file_field(&mut multipart, max_file_size).await?;
    tracing::info!(
        "Received upload {} ({:?}), size: {}KB",
        upload.file_name,
        upload.content_type,
        upload.data.len() / 1024
    );

    validate_upload(&upload, max_file_size)?;

    let analysis = tokio::task::spawn_blocking(move || ExcelAnalyzer.analyze_upload(&upload)).await??;

    if analysis.is_empty() {
        tracing::warn!("Upload parsed but no recognized sheet contained records");
        return Err(AppError::NoRecognizedSheets);
    }

    let summary = UploadSummary::from(&analysis);
    state.store.replace(analysis);
    tracing::info!(
        "Stored analysis with {} records from sheets {:?} in {:?}",
        summary.total_count,
        summary.sheets_found,
        start.elapsed()
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "File processed successfully".to_string(),
        summary,
    }))
}

async fn get_workbook(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Arc<WorkbookAnalysis>>, AppError> {
    state
        .store
        .current()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_WORKBOOK_MESSAGE.to_string()))
}

async fn clear_workbook(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    state.store.clear();
    Json(ClearResponse {
        success: true,
        message: "Workbook data cleared".to_string(),
    })
}

async fn workbook_summary(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<FilteredSummary>, AppError> {
    let analysis = state
        .store
        .current()
        .ok_or_else(|| AppError::NotFound(NO_WORKBOOK_MESSAGE.to_string()))?;
    tracing::debug!("Filtering stored analysis with {:?}", filter);
    Ok(Json(filter.apply(&analysis)))
}
