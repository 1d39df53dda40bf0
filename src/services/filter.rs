use crate::models::{removal_rate, Record, SheetCategory, StatusClass, WorkbookAnalysis};
use crate::services::excel::{normalize_status, UNKNOWN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel the dashboard sends for "no constraint".
const ALL: &str = "all";

/// Display-time filter over stored records. Unset, empty and `"all"` values match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub month: Option<String>,
    pub market: Option<String>,
    pub content_owner: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        let month_ok = constraint(&self.month).map_or(true, |m| record.month == m);
        let market_ok = constraint(&self.market).map_or(true, |m| record.market == m);
        let owner_ok = constraint(&self.content_owner).map_or(true, |o| record.content_owner == o);
        month_ok && market_ok && owner_ok
    }

    pub fn apply(&self, analysis: &WorkbookAnalysis) -> FilteredSummary {
        let mut sheets = Vec::with_capacity(analysis.sheets.len());
        let mut owners: HashMap<&str, StatusCounts> = HashMap::new();
        let mut markets: HashMap<&str, StatusCounts> = HashMap::new();

        for sheet in &analysis.sheets {
            let mut counts = StatusCounts::default();
            for record in sheet.records.iter().filter(|r| self.matches(r)) {
                let status = normalize_status(&record.status);
                counts.add(status);
                if record.content_owner != UNKNOWN {
                    owners.entry(&record.content_owner).or_default().add(status);
                }
                markets.entry(&record.market).or_default().add(status);
            }
            sheets.push(FilteredSheet {
                category: sheet.category,
                full_name: sheet.full_name.clone(),
                total_count: counts.total,
                active_count: counts.active,
                removed_count: counts.removed,
            });
        }

        let total_count = sheets.iter().map(|s| s.total_count).sum();
        let active_count = sheets.iter().map(|s| s.active_count).sum();
        let removed_count = sheets.iter().map(|s| s.removed_count).sum();

        FilteredSummary {
            total_count,
            active_count,
            removed_count,
            removal_rate_percent: removal_rate(removed_count, total_count),
            sheets,
            content_owners: breakdown(owners)
                .into_iter()
                .map(|(name, counts)| ContentOwnerBreakdown {
                    content_owner: name,
                    total_count: counts.total,
                    active_count: counts.active,
                    removed_count: counts.removed,
                })
                .collect(),
            markets: breakdown(markets)
                .into_iter()
                .map(|(name, counts)| MarketBreakdown {
                    market: name,
                    total_count: counts.total,
                    active_count: counts.active,
                    removed_count: counts.removed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StatusCounts {
    total: usize,
    active: usize,
    removed: usize,
}

impl StatusCounts {
    fn add(&mut self, status: StatusClass) {
        self.total += 1;
        match status {
            StatusClass::Active => self.active += 1,
            StatusClass::Removed => self.removed += 1,
            StatusClass::Unknown => {}
        }
    }
}

/// Largest groups first, ties broken by name.
fn breakdown(groups: HashMap<&str, StatusCounts>) -> Vec<(String, StatusCounts)> {
    let mut rows: Vec<(String, StatusCounts)> = groups
        .into_iter()
        .map(|(name, counts)| (name.to_string(), counts))
        .collect();
    rows.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredSheet {
    pub category: SheetCategory,
    pub full_name: String,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOwnerBreakdown {
    pub content_owner: String,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketBreakdown {
    pub market: String,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredSummary {
    pub sheets: Vec<FilteredSheet>,
    pub total_count: usize,
    pub active_count: usize,
    pub removed_count: usize,
    pub removal_rate_percent: f64,
    pub content_owners: Vec<ContentOwnerBreakdown>,
    pub markets: Vec<MarketBreakdown>,
}
