mod insights;
mod quality;
mod rows;
mod summary;
pub mod views;

pub use insights::QUICK_WIN_PAYBACK_YEARS;
pub use quality::{DataQualityWarning, WarningKind};
pub use rows::{derive_rows, EcmViewRow};
pub use summary::{average_payback, PortfolioSummary};
pub use views::{PortfolioInsights, PortfolioReport, RankedMeasure};

use super::building::BuildingInfo;
use super::domain::EcmRecord;

impl PortfolioReport {
    /// Runs the whole pipeline over one batch. The records are only read.
    pub fn build(records: &[EcmRecord]) -> Self {
        let building = BuildingInfo::from_records(records);
        let rows = derive_rows(records);
        let summary = PortfolioSummary::from_rows(&rows);
        let warnings = quality::collect_warnings(records, building.as_ref(), &rows);

        Self {
            building,
            rows,
            summary,
            warnings,
        }
    }

    /// Points rows and warnings back at their elements in the submitted batch.
    /// `source_indexes[id]` is the batch position of the record behind row `id`.
    pub fn with_source_indexes(mut self, source_indexes: &[usize]) -> Self {
        for row in &mut self.rows {
            if let Some(index) = source_indexes.get(row.id) {
                row.source_index = *index;
            }
        }
        for warning in &mut self.warnings {
            if let Some(index) = source_indexes.get(warning.record_id) {
                warning.source_index = *index;
            }
        }
        self
    }

    pub fn insights(&self) -> PortfolioInsights {
        insights::generate_insights(&self.rows, &self.summary)
    }
}
