use super::types::{STATUS_ACTIVE_KEYWORDS, STATUS_REMOVED_KEYWORDS};
use crate::models::StatusClass;

/// Active keywords are checked before removed keywords, so a status carrying
/// both classifies as active.
pub fn normalize_status(status: &str) -> StatusClass {
    let lower = status.trim().to_lowercase();
    if lower.is_empty() {
        return StatusClass::Unknown;
    }

    if STATUS_ACTIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        StatusClass::Active
    } else if STATUS_REMOVED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        StatusClass::Removed
    } else {
        StatusClass::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classifies_common_values() {
        assert_eq!(normalize_status("Active"), StatusClass::Active);
        assert_eq!(normalize_status("  LIVE "), StatusClass::Active);
        assert_eq!(normalize_status("Approved"), StatusClass::Active);
        assert_eq!(normalize_status("Removed"), StatusClass::Removed);
        assert_eq!(normalize_status("Taken Down"), StatusClass::Removed);
        assert_eq!(normalize_status("Offline"), StatusClass::Removed);
        assert_eq!(normalize_status("Pending"), StatusClass::Removed);
        assert_eq!(normalize_status("Deleted by host"), StatusClass::Removed);
    }

    #[test]
    fn blank_and_unmatched_are_unknown() {
        assert_eq!(normalize_status(""), StatusClass::Unknown);
        assert_eq!(normalize_status("   "), StatusClass::Unknown);
        assert_eq!(normalize_status("Unknown"), StatusClass::Unknown);
        assert_eq!(normalize_status("Reported"), StatusClass::Unknown);
    }

    #[test]
    fn active_check_precedes_removed_check() {
        assert_eq!(normalize_status("Pending Removal - Active"), StatusClass::Active);
        // "unavailable" contains "available".
        assert_eq!(normalize_status("Unavailable"), StatusClass::Active);
    }

    fn removed_only() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["removed", "down", "offline", "deleted", "taken down", "pending"])
            .prop_map(str::to_string)
    }

    fn active_only() -> impl Strategy<Value = String> {
        prop::sample::select(STATUS_ACTIVE_KEYWORDS.to_vec()).prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn active_keyword_wins_regardless_of_padding(
            keyword in active_only(),
            removed in prop::option::of(removed_only()),
            pad in "[ \t]{0,3}",
        ) {
            let status = match removed {
                Some(r) => format!("{pad}{r} / {}{pad}", keyword.to_uppercase()),
                None => format!("{pad}{keyword}{pad}"),
            };
            prop_assert_eq!(normalize_status(&status), StatusClass::Active);
        }

        #[test]
        fn removed_keyword_alone_is_removed(keyword in removed_only(), pad in "[ \t]{0,3}") {
            let status = format!("{pad}{}{pad}", keyword.to_uppercase());
            prop_assert_eq!(normalize_status(&status), StatusClass::Removed);
        }

        #[test]
        fn digits_only_are_unknown(status in "[0-9 ]{0,12}") {
            prop_assert_eq!(normalize_status(&status), StatusClass::Unknown);
        }
    }
}
