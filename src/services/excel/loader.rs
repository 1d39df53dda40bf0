use super::types::RawSheet;
use super::utils::cell_text;
use crate::error::AppError;
use crate::services::upload::UploadedFile;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Reader, Xls, Xlsx};
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
    Csv,
}

/// CSV is decided by name or declared type; binary workbooks by their container magic.
pub fn resolve_format(upload: &UploadedFile) -> Result<WorkbookFormat, AppError> {
    let is_csv_name = upload.file_name.to_lowercase().ends_with(".csv");
    let is_csv_type = upload
        .content_type
        .as_deref()
        .map_or(false, |ct| ct.eq_ignore_ascii_case("text/csv"));

    if is_csv_name || is_csv_type {
        Ok(WorkbookFormat::Csv)
    } else if upload.data.starts_with(ZIP_MAGIC) {
        Ok(WorkbookFormat::Xlsx)
    } else if upload.data.starts_with(OLE_MAGIC) {
        Ok(WorkbookFormat::Xls)
    } else {
        Err(AppError::ParseError(format!(
            "Unrecognized spreadsheet format for '{}'",
            upload.file_name
        )))
    }
}

/// Decodes the upload into its worksheets, in workbook order.
pub fn load_workbook(upload: &UploadedFile) -> Result<Vec<RawSheet>, AppError> {
    let start = std::time::Instant::now();
    let format = resolve_format(upload)?;
    tracing::info!("Opening {} as {:?}", upload.file_name, format);

    let sheets = match format {
        WorkbookFormat::Csv => vec![read_csv(upload)?],
        WorkbookFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(upload.data.clone()))
                .map_err(|e| open_error("Excel", e))?;
            read_sheets::<Cursor<Bytes>, _>(workbook)
        }
        WorkbookFormat::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(Cursor::new(upload.data.clone()))
                .map_err(|e| open_error("legacy Excel", e))?;
            read_sheets::<Cursor<Bytes>, _>(workbook)
        }
    };

    tracing::info!(
        "Workbook {} loaded in {:?}: {} sheets {:?}",
        upload.file_name,
        start.elapsed(),
        sheets.len(),
        sheets.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
    );
    Ok(sheets)
}

fn open_error(kind: &str, err: impl Display) -> AppError {
    tracing::error!("Failed to open {} file: {}", kind, err);
    AppError::ParseError(format!("Failed to open {} file: {}", kind, err))
}

fn read_sheets<RS, R>(mut workbook: R) -> Vec<RawSheet>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => {
                let rows: Vec<Vec<String>> = range
                    .rows()
                    .map(|row| row.iter().map(cell_text).collect())
                    .collect();
                sheets.push(RawSheet { name: sheet_name, rows });
            }
            Err(e) => {
                tracing::warn!("Failed to read worksheet {}: {}", sheet_name, e);
            }
        }
    }

    sheets
}

fn read_csv(upload: &UploadedFile) -> Result<RawSheet, AppError> {
    let name = Path::new(&upload.file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| upload.file_name.clone());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(upload.data.as_ref());

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    Ok(RawSheet { name, rows })
}
