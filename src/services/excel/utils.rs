use super::types::PLACEHOLDER_CELLS;
use calamine::{Data, ExcelDateTime};
use chrono::Duration;

/// Renders a calamine cell as the text the extractor works on. Falsy cells
/// (`0`, `false`) read as blank, like empty ones.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Bool(false) | Data::Int(0) => String::new(),
        Data::Float(f) if *f == 0.0 || f.is_nan() => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => excel_datetime_text(d),
        Data::Error(e) => e.to_string(),
    }
}

/// Dates as `YYYY-MM-DD` in the workbook's own date system, durations as `h:mm:ss`.
fn excel_datetime_text(value: &ExcelDateTime) -> String {
    let rendered = if value.is_duration() {
        value.as_duration().map(|duration: Duration| {
            let seconds = duration.num_seconds();
            let sign = if seconds < 0 { "-" } else { "" };
            let seconds = seconds.abs();
            format!(
                "{}{}:{:02}:{:02}",
                sign,
                seconds / 3600,
                seconds % 3600 / 60,
                seconds % 60
            )
        })
    } else {
        value
            .as_datetime()
            .map(|datetime| datetime.date().format("%Y-%m-%d").to_string())
    };
    rendered.unwrap_or_else(|| value.as_f64().to_string())
}

/// True for cells that carry no data: blank after trimming, or a literal placeholder.
pub fn is_blank_cell(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || PLACEHOLDER_CELLS.contains(&trimmed)
}

pub fn row_has_data(row: &[String]) -> bool {
    row.iter().any(|cell| !is_blank_cell(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;

    #[test]
    fn renders_scalar_cells() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Live".into())), "Live");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(3.5)), "3.5");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }

    #[test]
    fn falsy_cells_render_blank() {
        assert_eq!(cell_text(&Data::Int(0)), "");
        assert_eq!(cell_text(&Data::Float(0.0)), "");
        assert_eq!(cell_text(&Data::Bool(false)), "");
        assert_eq!(cell_text(&Data::Float(-2.0)), "-2");
    }

    #[test]
    fn dates_follow_the_workbook_date_system() {
        let serial_1900 = ExcelDateTime::new(45292.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(serial_1900)), "2024-01-01");

        let serial_1904 = ExcelDateTime::new(43830.0, ExcelDateTimeType::DateTime, true);
        assert_eq!(cell_text(&Data::DateTime(serial_1904)), "2024-01-01");
    }

    #[test]
    fn durations_render_as_elapsed_time() {
        let day_and_a_half = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_text(&Data::DateTime(day_and_a_half)), "36:00:00");

        let ninety_seconds = ExcelDateTime::new(90.0 / 86_400.0, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_text(&Data::DateTime(ninety_seconds)), "0:01:30");
    }

    #[test]
    fn placeholders_count_as_blank() {
        assert!(is_blank_cell("   "));
        assert!(is_blank_cell("null"));
        assert!(is_blank_cell(" undefined "));
        assert!(!is_blank_cell("NULL"));
        assert!(!is_blank_cell("0"));
    }

    #[test]
    fn row_data_detection() {
        let blank = vec!["".to_string(), "null".to_string(), " undefined".to_string()];
        assert!(!row_has_data(&blank));
        assert!(!row_has_data(&[]));
        let filled = vec!["".to_string(), "x".to_string()];
        assert!(row_has_data(&filled));
    }
}
