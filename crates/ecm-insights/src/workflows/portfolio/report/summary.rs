use super::super::financial::{simple_payback, Payback};
use super::rows::EcmViewRow;
use serde::Serialize;

/// Totals across all measures of one building audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub measure_count: usize,
    pub total_implementation_cost: f64,
    pub total_annual_savings: f64,
    pub total_incentives: f64,
    pub total_net_cost: f64,
    pub total_electricity_savings: f64,
    pub total_gas_savings: f64,
    pub total_demand_savings: f64,
    /// Sum over the measures whose lifetime is known.
    pub total_lifetime_savings: f64,
    /// Unweighted mean of the meaningful per-measure paybacks.
    pub average_payback: Payback,
    /// Total net cost over total annual savings.
    pub portfolio_payback: Payback,
}

impl PortfolioSummary {
    pub fn from_rows(rows: &[EcmViewRow]) -> Self {
        let total = |field: fn(&EcmViewRow) -> f64| rows.iter().map(field).sum::<f64>();

        let total_annual_savings = total(|row| row.annual_cost_savings);
        let total_net_cost = total(|row| row.net_cost);

        Self {
            measure_count: rows.len(),
            total_implementation_cost: total(|row| row.implementation_cost),
            total_annual_savings,
            total_incentives: total(|row| row.incentives),
            total_net_cost,
            total_electricity_savings: total(|row| row.electricity_savings),
            total_gas_savings: total(|row| row.gas_savings),
            total_demand_savings: total(|row| row.demand_savings),
            total_lifetime_savings: rows.iter().filter_map(|row| row.lifetime_savings).sum(),
            average_payback: average_payback(rows),
            portfolio_payback: simple_payback(total_net_cost, total_annual_savings),
        }
    }
}

/// Mean of the finite, positive paybacks; `NotApplicable` when there are none.
pub fn average_payback(rows: &[EcmViewRow]) -> Payback {
    let paybacks: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.simple_payback.meaningful_years())
        .collect();

    if paybacks.is_empty() {
        return Payback::NotApplicable;
    }

    Payback::from_years(paybacks.iter().sum::<f64>() / paybacks.len() as f64)
}
