pub mod analyzer;
pub mod classifier;
pub mod columns;
pub mod extractor;
pub mod loader;
pub mod status;
pub mod types;
pub mod utils;

pub use analyzer::ExcelAnalyzer;
pub use status::normalize_status;
pub use types::UNKNOWN;
