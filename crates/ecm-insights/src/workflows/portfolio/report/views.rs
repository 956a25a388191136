use super::super::building::BuildingInfo;
use super::super::financial::Payback;
use super::quality::DataQualityWarning;
use super::rows::EcmViewRow;
use super::summary::PortfolioSummary;
use serde::Serialize;

/// Everything the presentation layer needs for one extraction batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub building: Option<BuildingInfo>,
    pub rows: Vec<EcmViewRow>,
    pub summary: PortfolioSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMeasure {
    pub id: usize,
    pub ecm_name: String,
    pub simple_payback: Payback,
    pub annual_cost_savings: f64,
    /// Share of the portfolio's annual cost savings, 0..=1 when savings are positive.
    pub savings_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioInsights {
    pub measure_count: usize,
    pub meaningful_payback_count: usize,
    pub pays_back_within_lifetime: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quickest_payback: Option<RankedMeasure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_savings: Option<RankedMeasure>,
    pub payback_ranking: Vec<RankedMeasure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quick_wins: Vec<RankedMeasure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}
