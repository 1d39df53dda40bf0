use super::types::ColumnRole;
use crate::models::SheetCategory;
use std::collections::HashMap;

/// Column index per semantic role; roles without a matching header are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    indices: HashMap<ColumnRole, usize>,
}

impl ColumnMapping {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.indices.get(&role).copied()
    }

    pub fn has(&self, role: ColumnRole) -> bool {
        self.indices.contains_key(&role)
    }
}

/// Index of the first header (trimmed, lower-cased) containing any keyword.
/// Scan order is column order, not keyword order.
pub fn find_column_index(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim().to_lowercase();
        keywords.iter().any(|keyword| header.contains(keyword))
    })
}

pub fn detect_columns(headers: &[String], category: SheetCategory) -> ColumnMapping {
    let indices = ColumnRole::ALL
        .iter()
        .filter_map(|&role| {
            role.keyword_tiers(category)
                .iter()
                .find_map(|tier| find_column_index(headers, tier))
                .map(|idx| (role, idx))
        })
        .collect();

    let mapping = ColumnMapping { indices };
    tracing::debug!("Detected columns for {}: {:?}", category, mapping.indices);
    mapping
}
