use super::super::domain::EcmRecord;
use super::super::financial::{FinancialMetrics, Payback};
use super::super::savings::SavingsBreakdown;
use serde::Serialize;

/// Display-ready projection of one measure. Recomputed from the records on every build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcmViewRow {
    /// Position of the source record in the batch.
    pub id: usize,
    /// Position of the record in the submitted batch, counting elements the importer skipped.
    /// Equals `id` unless the batch came through a lenient import.
    pub source_index: usize,
    pub ecm_name: String,
    pub ecm_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecm_additional_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecm_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecm_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_identified: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_ids: Vec<String>,
    pub implementation_cost: f64,
    pub incentives: f64,
    pub net_cost: f64,
    pub ecm_lifetime_years: Option<f64>,
    pub annual_cost_savings: f64,
    pub electricity_savings: f64,
    pub gas_savings: f64,
    pub demand_savings: f64,
    pub simple_payback: Payback,
    pub lifetime_savings: Option<f64>,
}

impl EcmViewRow {
    pub fn from_record(id: usize, record: &EcmRecord) -> Self {
        let savings = SavingsBreakdown::from_entries(&record.savings_entries);
        let lifetime_years = record.lifetime_years();
        let incentives = record.incentive_value();
        let financials = FinancialMetrics::compute(
            record.implementation_cost.value,
            Some(incentives),
            savings.annual_cost_savings,
            lifetime_years,
        );

        Self {
            id,
            source_index: id,
            ecm_name: record.ecm_name.clone(),
            ecm_description: record.ecm_description.clone().unwrap_or_default(),
            ecm_additional_details: record.ecm_additional_details.clone(),
            ecm_status: record.ecm_status.clone(),
            ecm_scope: record.ecm_scope.clone(),
            date_identified: record.date_identified.clone(),
            package_ids: record.package_ids.clone(),
            implementation_cost: record.implementation_cost.value,
            incentives,
            net_cost: financials.net_cost,
            ecm_lifetime_years: lifetime_years,
            annual_cost_savings: savings.annual_cost_savings,
            electricity_savings: savings.electricity_savings,
            gas_savings: savings.gas_savings,
            demand_savings: savings.demand_savings,
            simple_payback: financials.simple_payback,
            lifetime_savings: financials.lifetime_savings,
        }
    }

    /// Whether the measure recovers its net cost before its useful life ends.
    pub fn pays_back_within_lifetime(&self) -> bool {
        match (self.simple_payback.meaningful_years(), self.ecm_lifetime_years) {
            (Some(payback), Some(lifetime)) => payback <= lifetime,
            _ => false,
        }
    }
}

/// One row per record, in input order.
pub fn derive_rows(records: &[EcmRecord]) -> Vec<EcmViewRow> {
    records
        .iter()
        .enumerate()
        .map(|(id, record)| EcmViewRow::from_record(id, record))
        .collect()
}
