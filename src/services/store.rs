//! Process-wide single slot holding the most recent analysis.
//!
//! The slot starts empty. Every successful upload swaps in a fully assembled
//! analysis under one write lock, so readers observe either the previous
//! analysis, the new one, or nothing. Concurrent uploads resolve as last
//! write wins.

use crate::models::WorkbookAnalysis;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AnalysisStore {
    slot: RwLock<Option<Arc<WorkbookAnalysis>>>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<WorkbookAnalysis>> {
        self.slot.read().clone()
    }

    /// Replaces the slot wholesale and returns the analysis it held before.
    pub fn replace(&self, analysis: WorkbookAnalysis) -> Option<Arc<WorkbookAnalysis>> {
        let analysis = Arc::new(analysis);
        self.slot.write().replace(analysis)
    }

    pub fn clear(&self) {
        if self.slot.write().take().is_some() {
            tracing::info!("Cleared stored workbook analysis");
        }
    }
}
