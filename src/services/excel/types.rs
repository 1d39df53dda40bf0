//! Declarative keyword tables driving sheet classification, column
//! detection and status normalization. Table order is match order.

use crate::models::SheetCategory;

/// Default text for a blank status, market or content owner.
pub const UNKNOWN: &str = "Unknown";

/// Cell texts that count as empty when deciding whether a row has data.
pub const PLACEHOLDER_CELLS: &[&str] = &["null", "undefined"];

pub const STATUS_ACTIVE_KEYWORDS: &[&str] =
    &["active", "up", "live", "online", "available", "approved"];

pub const STATUS_REMOVED_KEYWORDS: &[&str] = &[
    "removed",
    "down",
    "offline",
    "deleted",
    "taken down",
    "unavailable",
    "pending",
];

/// Primary sheet-name rule: the lower-cased name contains any phrase or equals the tag.
#[derive(Debug)]
pub struct SheetNameRule {
    pub category: SheetCategory,
    pub contains: &'static [&'static str],
    pub equals: &'static str,
}

pub const SHEET_NAME_RULES: &[SheetNameRule] = &[
    SheetNameRule {
        category: SheetCategory::Usr,
        contains: &["unauthorized search", "a."],
        equals: "usr",
    },
    SheetNameRule {
        category: SheetCategory::Atsm,
        contains: &["ads tutorial", "b1"],
        equals: "atsm",
    },
    SheetNameRule {
        category: SheetCategory::Pssm,
        contains: &["password sharing-social", "password sharing - social", "c1"],
        equals: "pssm",
    },
    SheetNameRule {
        category: SheetCategory::Psmp,
        contains: &[
            "password sharing-marketplace",
            "password sharing - marketplace",
            "c2",
        ],
        equals: "psmp",
    },
];

/// Fallback rules, consulted only when no primary rule matched: every word must appear.
pub const SHEET_NAME_FALLBACKS: &[(SheetCategory, &[&str])] = &[
    (SheetCategory::Pssm, &["password", "social"]),
    (SheetCategory::Psmp, &["password", "market"]),
];

/// Semantic roles a header column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Status,
    Market,
    Month,
    ContentOwner,
    Url,
    With,
    GoogleStatus,
    BingStatus,
    YandexStatus,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 9] = [
        ColumnRole::Status,
        ColumnRole::Market,
        ColumnRole::Month,
        ColumnRole::ContentOwner,
        ColumnRole::Url,
        ColumnRole::With,
        ColumnRole::GoogleStatus,
        ColumnRole::BingStatus,
        ColumnRole::YandexStatus,
    ];

    /// Keyword tiers for this role. Each tier is scanned across the whole
    /// header row before the next tier is tried.
    pub fn keyword_tiers(self, category: SheetCategory) -> &'static [&'static [&'static str]] {
        match self {
            ColumnRole::Status => match category {
                SheetCategory::Pssm | SheetCategory::Psmp => &[&["url status"], &["status"]],
                SheetCategory::Usr | SheetCategory::Atsm => &[&["status", "state", "result"]],
            },
            ColumnRole::Market => &[&["market", "country", "region", "location", "geo"]],
            ColumnRole::Month => &[&["month", "date", "period", "time"]],
            ColumnRole::ContentOwner => &[&[
                "content owner",
                "owner",
                "content_owner",
                "contentowner",
                "rights holder",
                "rightsholder",
            ]],
            ColumnRole::Url => &[&["url", "link", "address", "uri"]],
            ColumnRole::With => &[&["with", "associated", "linked"]],
            ColumnRole::GoogleStatus => &[&["url status google"]],
            ColumnRole::BingStatus => &[&["url status bing"]],
            ColumnRole::YandexStatus => &[&["url status yandex"]],
        }
    }
}

/// Search-engine status columns consulted, in order, when a USR row has no primary status.
pub const SEARCH_ENGINE_STATUS_ROLES: [ColumnRole; 3] = [
    ColumnRole::GoogleStatus,
    ColumnRole::BingStatus,
    ColumnRole::YandexStatus,
];

/// A worksheet decoded to cell texts, in workbook order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}
