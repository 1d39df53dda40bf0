use super::columns::{detect_columns, ColumnMapping};
use super::status::normalize_status;
use super::types::{ColumnRole, SEARCH_ENGINE_STATUS_ROLES, UNKNOWN};
use super::utils::row_has_data;
use crate::models::{Record, SheetCategory, SheetResult, StatusClass};
use std::collections::BTreeSet;

/// One sheet's records plus the distinct filter values it contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetExtraction {
    pub sheet: SheetResult,
    pub months: BTreeSet<String>,
    pub markets: BTreeSet<String>,
    pub content_owners: BTreeSet<String>,
}

impl SheetExtraction {
    fn empty(category: SheetCategory) -> Self {
        Self {
            sheet: SheetResult::empty(category),
            months: BTreeSet::new(),
            markets: BTreeSet::new(),
            content_owners: BTreeSet::new(),
        }
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Detects the header layout of `rows[0]` and extracts every data row.
pub fn process_sheet(rows: &[Vec<String>], category: SheetCategory) -> SheetExtraction {
    if rows.len() < 2 {
        tracing::debug!("Sheet for {} has no data rows", category);
        return SheetExtraction::empty(category);
    }

    let columns = detect_columns(&rows[0], category);
    extract_records(rows, category, &columns)
}

/// Walks the data rows (the header row is skipped) and builds canonical records.
pub fn extract_records(
    rows: &[Vec<String>],
    category: SheetCategory,
    columns: &ColumnMapping,
) -> SheetExtraction {
    let mut extraction = SheetExtraction::empty(category);
    let mut skipped = 0usize;

    for row in rows.iter().skip(1) {
        if !row_has_data(row) {
            skipped += 1;
            continue;
        }

        let mut status = cell(row, columns.get(ColumnRole::Status)).trim();
        let mut url = cell(row, columns.get(ColumnRole::Url)).trim();

        if category == SheetCategory::Usr && status.is_empty() {
            status = SEARCH_ENGINE_STATUS_ROLES
                .iter()
                .map(|&role| cell(row, columns.get(role)).trim())
                .find(|value| !value.is_empty())
                .unwrap_or("");
        }

        // Without detected columns, fall back to the first two cells.
        if status.is_empty() && !columns.has(ColumnRole::Status) {
            status = cell(row, Some(0)).trim();
        }
        if url.is_empty() && !columns.has(ColumnRole::Url) {
            url = cell(row, Some(1)).trim();
        }

        if status.is_empty() && url.is_empty() {
            skipped += 1;
            continue;
        }

        let record = Record {
            url: url.to_string(),
            status: or_unknown(status),
            market: or_unknown(cell(row, columns.get(ColumnRole::Market)).trim()),
            month: cell(row, columns.get(ColumnRole::Month)).trim().to_string(),
            content_owner: or_unknown(cell(row, columns.get(ColumnRole::ContentOwner)).trim()),
        };

        match normalize_status(&record.status) {
            StatusClass::Active => extraction.sheet.active_count += 1,
            StatusClass::Removed => extraction.sheet.removed_count += 1,
            StatusClass::Unknown => {}
        }

        if !record.month.is_empty() {
            extraction.months.insert(record.month.clone());
        }
        if record.market != UNKNOWN {
            extraction.markets.insert(record.market.clone());
        }
        if record.content_owner != UNKNOWN {
            extraction.content_owners.insert(record.content_owner.clone());
        }

        extraction.sheet.records.push(record);
    }

    extraction.sheet.total_count = extraction.sheet.records.len();
    tracing::debug!(
        "Extracted {} records from {} ({} active, {} removed, {} rows skipped)",
        extraction.sheet.total_count,
        category,
        extraction.sheet.active_count,
        extraction.sheet.removed_count,
        skipped
    );
    extraction
}
