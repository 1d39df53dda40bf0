use super::types::{SHEET_NAME_FALLBACKS, SHEET_NAME_RULES};
use crate::models::SheetCategory;

/// Maps a raw sheet name to its canonical category, or `None` when the
/// sheet should be ignored.
pub fn classify_sheet_name(sheet_name: &str) -> Option<SheetCategory> {
    let lower = sheet_name.trim().to_lowercase();

    let primary = SHEET_NAME_RULES.iter().find(|rule| {
        lower == rule.equals || rule.contains.iter().any(|phrase| lower.contains(phrase))
    });
    if let Some(rule) = primary {
        return Some(rule.category);
    }

    SHEET_NAME_FALLBACKS
        .iter()
        .find(|(_, words)| words.iter().all(|word| lower.contains(word)))
        .map(|(category, _)| *category)
}
