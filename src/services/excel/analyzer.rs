use super::classifier::classify_sheet_name;
use super::extractor::{process_sheet, SheetExtraction};
use super::loader::load_workbook;
use super::types::RawSheet;
use crate::error::AppError;
use crate::models::{removal_rate, SheetCategory, SheetResult, WorkbookAnalysis};
use crate::services::upload::UploadedFile;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

pub struct ExcelAnalyzer;

impl ExcelAnalyzer {
    /// Parses the upload and assembles the full analysis. Only an unreadable
    /// buffer is an error; unrecognized sheets simply produce empty categories.
    pub fn analyze_upload(&self, upload: &UploadedFile) -> Result<WorkbookAnalysis, AppError> {
        let start = std::time::Instant::now();
        let sheets = load_workbook(upload)?;
        let analysis = self.assemble(&sheets);
        tracing::info!(
            "Analysis of {} completed in {:?}: {} records, {} active, {} removed",
            upload.file_name,
            start.elapsed(),
            analysis.total_count,
            analysis.active_count,
            analysis.removed_count
        );
        Ok(analysis)
    }

    pub fn assemble(&self, sheets: &[RawSheet]) -> WorkbookAnalysis {
        let mut selected: Vec<(SheetCategory, &RawSheet)> = Vec::new();

        for sheet in sheets {
            match classify_sheet_name(&sheet.name) {
                None => tracing::debug!("Ignoring unrecognized sheet {:?}", sheet.name),
                Some(category) if selected.iter().any(|(c, _)| *c == category) => {
                    tracing::debug!(
                        "Ignoring sheet {:?}: {} already taken by an earlier sheet",
                        sheet.name,
                        category
                    );
                }
                Some(category) => {
                    tracing::info!("Sheet {:?} classified as {}", sheet.name, category);
                    selected.push((category, sheet));
                }
            }
        }

        // Sheets are independent; collect keeps workbook order.
        let extractions: Vec<SheetExtraction> = selected
            .par_iter()
            .map(|(category, sheet)| process_sheet(&sheet.rows, *category))
            .collect();

        let mut months = BTreeSet::new();
        let mut markets = BTreeSet::new();
        let mut content_owners = BTreeSet::new();
        let mut found: HashMap<SheetCategory, SheetResult> = HashMap::new();

        for extraction in extractions {
            months.extend(extraction.months);
            markets.extend(extraction.markets);
            content_owners.extend(extraction.content_owners);
            found.insert(extraction.sheet.category, extraction.sheet);
        }

        let sheets: Vec<SheetResult> = SheetCategory::ALL
            .iter()
            .map(|&category| {
                found
                    .remove(&category)
                    .unwrap_or_else(|| SheetResult::empty(category))
            })
            .collect();

        let total_count: usize = sheets.iter().map(|s| s.total_count).sum();
        let active_count: usize = sheets.iter().map(|s| s.active_count).sum();
        let removed_count: usize = sheets.iter().map(|s| s.removed_count).sum();
        let category_total = |category: SheetCategory| {
            sheets
                .iter()
                .find(|s| s.category == category)
                .map_or(0, |s| s.total_count)
        };
        let usr_atsm_count = category_total(SheetCategory::Usr) + category_total(SheetCategory::Atsm);
        let pssm_psmp_count = category_total(SheetCategory::Pssm) + category_total(SheetCategory::Psmp);

        WorkbookAnalysis {
            total_count,
            active_count,
            removed_count,
            removal_rate_percent: removal_rate(removed_count, total_count),
            usr_atsm_count,
            pssm_psmp_count,
            months: months.into_iter().collect(),
            markets: markets.into_iter().collect(),
            content_owners: content_owners.into_iter().collect(),
            sheets,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    /// Builds an in-memory xlsx with one worksheet per `(name, rows)` pair.
    pub(crate) fn xlsx_fixture(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    /// One active and one removed URL per canonical sheet.
    pub(crate) fn four_sheet_fixture() -> Vec<u8> {
        xlsx_fixture(&[
            (
                "Unauthorized Search Result",
                &[
                    &["URL", "Status", "Market", "Month", "Content Owner"],
                    &["http://usr/1", "Active", "Brazil", "Jan", "Studio A"],
                    &["http://usr/2", "Removed", "Chile", "Feb", "Studio B"],
                ],
            ),
            (
                "Ads Tutorials- Social Media",
                &[
                    &["Link", "State", "Country", "Month"],
                    &["http://atsm/1", "Live", "Brazil", "Jan"],
                    &["http://atsm/2", "Taken down", "Peru", "Mar"],
                ],
            ),
            (
                "Password Sharing-Social Med.",
                &[
                    &["URL", "URL Status", "Market"],
                    &["http://pssm/1", "Online", "Mexico"],
                    &["http://pssm/2", "Deleted", "Mexico"],
                ],
            ),
            (
                "Password Sharing-Marketplace",
                &[
                    &["URL", "Status", "Rights Holder"],
                    &["http://psmp/1", "Approved", "Studio A"],
                    &["http://psmp/2", "Offline", "Studio C"],
                ],
            ),
        ])
    }

    fn raw(name: &str, rows: &[&[&str]]) -> RawSheet {
        RawSheet {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn sheet(analysis: &WorkbookAnalysis, category: SheetCategory) -> &SheetResult {
        analysis.sheets.iter().find(|s| s.category == category).unwrap()
    }

    fn upload(name: &str, data: Vec<u8>) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: None,
            data: Bytes::from(data),
        }
    }

    #[test]
    fn one_active_and_one_removed_per_sheet() {
        let analysis = ExcelAnalyzer
            .analyze_upload(&upload("book.xlsx", four_sheet_fixture()))
            .unwrap();

        assert_eq!(analysis.total_count, 8);
        assert_eq!(analysis.active_count, 4);
        assert_eq!(analysis.removed_count, 4);
        assert_eq!(analysis.removal_rate_percent, 50.0);
        assert_eq!(analysis.usr_atsm_count, 4);
        assert_eq!(analysis.pssm_psmp_count, 4);
        assert_eq!(analysis.months, vec!["Feb", "Jan", "Mar"]);
        assert_eq!(analysis.markets, vec!["Brazil", "Chile", "Mexico", "Peru"]);
        assert_eq!(analysis.content_owners, vec!["Studio A", "Studio B", "Studio C"]);
    }

    #[test]
    fn sheets_are_always_four_in_canonical_order() {
        let sheets = vec![
            raw("PSMP", &[&["URL", "Status"], &["http://x", "Removed"]]),
            raw("Summary", &[&["URL", "Status"], &["http://y", "Active"]]),
        ];
        let analysis = ExcelAnalyzer.assemble(&sheets);

        let order: Vec<SheetCategory> = analysis.sheets.iter().map(|s| s.category).collect();
        assert_eq!(order, SheetCategory::ALL.to_vec());
        assert_eq!(sheet(&analysis, SheetCategory::Psmp).total_count, 1);
        assert_eq!(sheet(&analysis, SheetCategory::Usr), &SheetResult::empty(SheetCategory::Usr));
        // "Summary" is unclassified and contributes nothing.
        assert_eq!(analysis.total_count, 1);
        assert_eq!(analysis.removal_rate_percent, 100.0);
    }

    #[test]
    fn first_sheet_of_a_category_wins() {
        let sheets = vec![
            raw("USR", &[&["URL", "Status", "Market"], &["http://first", "Active", "Peru"]]),
            raw(
                "Unauthorized Search Result (old)",
                &[&["URL", "Status", "Market"], &["http://second", "Removed", "Chile"]],
            ),
        ];
        let analysis = ExcelAnalyzer.assemble(&sheets);
        let usr = sheet(&analysis, SheetCategory::Usr);
        assert_eq!(usr.records.len(), 1);
        assert_eq!(usr.records[0].url, "http://first");
        // The dropped sheet's distinct values are not merged either.
        assert_eq!(analysis.markets, vec!["Peru"]);
    }

    #[test]
    fn empty_workbook_has_zero_rate() {
        let analysis = ExcelAnalyzer.assemble(&[]);
        assert!(analysis.is_empty());
        assert_eq!(analysis.total_count, 0);
        assert_eq!(analysis.removal_rate_percent, 0.0);
        assert_eq!(analysis.sheets.len(), 4);
    }

    #[test]
    fn totals_equal_sum_of_sheets() {
        let sheets = vec![
            raw("USR", &[&["URL", "Status"], &["a", "Active"], &["b", "Unclear"]]),
            raw("C1", &[&["URL", "URL Status"], &["c", "Pending"]]),
        ];
        let analysis = ExcelAnalyzer.assemble(&sheets);
        let summed: usize = analysis.sheets.iter().map(|s| s.total_count).sum();
        assert_eq!(analysis.total_count, summed);
        assert_eq!(analysis.total_count, 3);
        assert_eq!(analysis.pssm_psmp_count, 1);
        assert!((analysis.removal_rate_percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unreadable_buffer_is_a_parse_failure() {
        let result = ExcelAnalyzer.analyze_upload(&upload("book.xlsx", b"plain text".to_vec()));
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }
}
