use super::domain::{FuelType, SavingsEntry};
use serde::Serialize;

/// Per-measure savings figures derived from its savings entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SavingsBreakdown {
    pub annual_cost_savings: f64,
    pub electricity_savings: f64,
    pub gas_savings: f64,
    pub demand_savings: f64,
}

impl SavingsBreakdown {
    pub fn from_entries(entries: &[SavingsEntry]) -> Self {
        Self {
            annual_cost_savings: total_cost_savings(entries),
            electricity_savings: energy_savings(entries, &FuelType::Electricity),
            gas_savings: energy_savings(entries, &FuelType::NaturalGas),
            demand_savings: demand_savings(entries),
        }
    }
}

/// Energy savings of the first entry for `fuel`, or 0 when there is none.
///
/// Zero stands in for "no entry" as well as for a reported zero.
pub fn energy_savings(entries: &[SavingsEntry], fuel: &FuelType) -> f64 {
    entries
        .iter()
        .find(|entry| entry.fuel_type == *fuel)
        .and_then(|entry| entry.energy_savings.as_ref())
        .map_or(0.0, |quantity| quantity.value)
}

/// Peak demand savings, read from the electricity entry only.
pub fn demand_savings(entries: &[SavingsEntry]) -> f64 {
    entries
        .iter()
        .find(|entry| entry.fuel_type == FuelType::Electricity)
        .and_then(|entry| entry.demand_savings.as_ref())
        .map_or(0.0, |quantity| quantity.value)
}

/// Annual cost savings: the `Total` entry's figure when it carries one, otherwise the sum of
/// every entry's cost savings.
pub fn total_cost_savings(entries: &[SavingsEntry]) -> f64 {
    let reported_total = entries
        .iter()
        .find(|entry| entry.fuel_type == FuelType::Total)
        .and_then(|entry| entry.cost_savings.as_ref());

    match reported_total {
        Some(total) => total.value,
        None => entries
            .iter()
            .filter_map(|entry| entry.cost_savings.as_ref())
            .map(|quantity| quantity.value)
            .sum(),
    }
}

/// Fuel types listed more than once, in order of their first repeat.
pub fn duplicate_fuel_types(entries: &[SavingsEntry]) -> Vec<FuelType> {
    let mut duplicates: Vec<FuelType> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let repeated = entries[..index]
            .iter()
            .any(|earlier| earlier.fuel_type == entry.fuel_type);
        if repeated && !duplicates.contains(&entry.fuel_type) {
            duplicates.push(entry.fuel_type.clone());
        }
    }
    duplicates
}
