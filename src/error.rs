use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;

use crate::models::SheetCategory;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("File is too large. Maximum size is {}MB.", .limit / (1024 * 1024))]
    PayloadTooLarge { limit: usize },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("No recognized sheets contained any records")]
    NoRecognizedSheets,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown when an upload parsed but none of the canonical sheets had rows.
    pub fn no_recognized_sheets_message() -> String {
        let names = SheetCategory::ALL
            .iter()
            .map(|category| format!("'{}'", category.full_name()))
            .collect::<Vec<_>>();
        let listed = match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            _ => names.join(", "),
        };
        format!(
            "No valid data found in the uploaded file. Please ensure your Excel file contains sheets named {}.",
            listed
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Workbook processing task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            AppError::ParseError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoRecognizedSheets => {
                (StatusCode::BAD_REQUEST, AppError::no_recognized_sheets_message())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
