use serde::{Deserialize, Serialize};
use std::fmt;

/// The four canonical record groupings, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SheetCategory {
    Usr,
    Atsm,
    Pssm,
    Psmp,
}

impl SheetCategory {
    pub const ALL: [SheetCategory; 4] = [
        SheetCategory::Usr,
        SheetCategory::Atsm,
        SheetCategory::Pssm,
        SheetCategory::Psmp,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            SheetCategory::Usr => "USR",
            SheetCategory::Atsm => "ATSM",
            SheetCategory::Pssm => "PSSM",
            SheetCategory::Psmp => "PSMP",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            SheetCategory::Usr => "Unauthorized Search Result",
            SheetCategory::Atsm => "Ads Tutorials- Social Media",
            SheetCategory::Pssm => "Password Sharing-Social Med.",
            SheetCategory::Psmp => "Password Sharing-Marketplace",
        }
    }
}

impl fmt::Display for SheetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Active,
    Removed,
    Unknown,
}

/// One normalized row, independent of the source sheet's column layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub url: String,
    pub status: String,
    pub market: String,
    pub month: String,
    pub content_owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResult {
    pub category: SheetCategory,
    pub full_name: String,
    pub records: Vec<Record>,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
}

impl SheetResult {
    /// Placeholder for a category the workbook did not contain.
    pub fn empty(category: SheetCategory) -> Self {
        Self {
            category,
            full_name: category.full_name().to_string(),
            records: Vec::new(),
            total_count: 0,
            active_count: 0,
            removed_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookAnalysis {
    pub sheets: Vec<SheetResult>,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
    pub removal_rate_percent: f64,
    pub usr_atsm_count: usize,
    pub pssm_psmp_count: usize,
    pub months: Vec<String>,
    pub markets: Vec<String>,
    pub content_owners: Vec<String>,
}

impl WorkbookAnalysis {
    /// True when no canonical sheet produced a single record.
    pub fn is_empty(&self) -> bool {
        self.sheets.iter().all(|sheet| sheet.total_count == 0)
    }
}

/// Percentage of `removed` over `total`, 0 for an empty total.
pub fn removal_rate(removed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        removed as f64 / total as f64 * 100.0
    }
}
