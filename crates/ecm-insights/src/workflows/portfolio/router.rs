use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::domain::EcmRecord;
use super::report::{PortfolioInsights, PortfolioReport};
use crate::error::AppError;
use crate::workflows::extraction::{RecordImporter, RejectedRecord};

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: PortfolioReport,
    pub insights: PortfolioInsights,
    pub skipped: Vec<RejectedRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionImportRequest {
    pub llm_response: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractionImportResponse {
    pub records: Vec<EcmRecord>,
    pub record_count: usize,
    /// Batch position of each entry in `records`.
    pub source_indexes: Vec<usize>,
    pub skipped: Vec<RejectedRecord>,
}

/// Router exposing report generation over a JSON record batch and import of raw
/// extraction responses.
pub fn portfolio_router(importer: RecordImporter) -> Router {
    Router::new()
        .route("/api/v1/portfolio/report", post(report_handler))
        .route("/api/v1/extraction/import", post(import_handler))
        .with_state(importer)
}

pub(crate) async fn report_handler(
    State(importer): State<RecordImporter>,
    body: Bytes,
) -> Result<Json<ReportResponse>, AppError> {
    let outcome = importer.from_slice(&body)?;
    let report = outcome.report();
    let insights = report.insights();

    tracing::info!(
        measures = report.rows.len(),
        skipped = outcome.rejected.len(),
        warnings = report.warnings.len(),
        "built portfolio report"
    );

    Ok(Json(ReportResponse {
        report,
        insights,
        skipped: outcome.rejected,
    }))
}

pub(crate) async fn import_handler(
    State(importer): State<RecordImporter>,
    Json(request): Json<ExtractionImportRequest>,
) -> Result<Json<ExtractionImportResponse>, AppError> {
    let outcome = importer.from_llm_response(&request.llm_response)?;
    let record_count = outcome.record_count();

    tracing::info!(
        records = record_count,
        skipped = outcome.rejected.len(),
        "imported extraction response"
    );

    Ok(Json(ExtractionImportResponse {
        records: outcome.records,
        record_count,
        source_indexes: outcome.source_indexes,
        skipped: outcome.rejected,
    }))
}
