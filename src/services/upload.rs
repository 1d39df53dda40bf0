use crate::error::AppError;
use bytes::Bytes;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
    "application/octet-stream",
];

const ALLOWED_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

/// The `file` field of an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Accepts a known extension OR a whitelisted content type.
pub fn is_allowed_file_type(file_name: &str, content_type: Option<&str>) -> bool {
    let lower_name = file_name.to_lowercase();
    let has_valid_extension = ALLOWED_EXTENSIONS.iter().any(|ext| lower_name.ends_with(ext));

    let has_valid_mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_lowercase())
        .map_or(false, |ct| ALLOWED_MIME_TYPES.contains(&ct.as_str()));

    has_valid_extension || has_valid_mime
}

pub fn validate_upload(upload: &UploadedFile, max_file_size: usize) -> Result<(), AppError> {
    if !is_allowed_file_type(&upload.file_name, upload.content_type.as_deref()) {
        tracing::warn!(
            "Rejected upload {} with content type {:?}",
            upload.file_name,
            upload.content_type
        );
        return Err(AppError::InvalidInput(
            "Invalid file type. Please upload an Excel file (.xlsx, .xls) or CSV file.".to_string(),
        ));
    }

    if upload.data.len() > max_file_size {
        tracing::warn!(
            "Rejected upload {}: {} bytes exceeds {} byte limit",
            upload.file_name,
            upload.data.len(),
            max_file_size
        );
        return Err(AppError::PayloadTooLarge { limit: max_file_size });
    }

    Ok(())
}
