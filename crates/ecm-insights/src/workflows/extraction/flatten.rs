use super::schema::{ExtractedEcm, MoneyQuantity, UnitQuantity};
use crate::workflows::portfolio::{EcmRecord, FuelType, Quantity, SavingsEntry};

const DEFAULT_STATUS: &str = "recommended";
const DEFAULT_SCOPE: &str = "Other";
const DEFAULT_LIFETIME_YEARS: f64 = 15.0;

fn money(quantity: &MoneyQuantity) -> Quantity {
    Quantity::new(quantity.value, quantity.currency.clone())
}

fn unit(quantity: &UnitQuantity) -> Quantity {
    Quantity::new(quantity.value, quantity.unit.clone())
}

fn demand(value: Option<f64>) -> Option<Quantity> {
    value
        .filter(|kw| *kw != 0.0)
        .map(|kw| Quantity::new(kw, "kW"))
}

/// Flattens a nested extraction result into the record shape the portfolio pipeline reads.
pub fn flatten(extracted: &ExtractedEcm) -> EcmRecord {
    let ecm = &extracted.ecm;

    let implementation_cost = ecm
        .cost_estimate
        .as_ref()
        .map(money)
        .unwrap_or_else(|| Quantity::new(0.0, "USD"));
    let mut record = EcmRecord::new(ecm.name.clone(), implementation_cost);

    if let Some(submission) = &extracted.submission {
        record.source_filename = submission.source_filename.clone();
        record.source_file_type = Some("pdf".to_string());
        record.submitter_organization = submission.extracted_by.clone();
    }

    if let Some(building) = &extracted.building {
        let floor_area = building
            .gross_floor_area
            .as_ref()
            .map(unit)
            .unwrap_or_else(|| Quantity::new(0.0, "sf"));
        record.building_name = building.building_name.clone();
        record.building_address = building.address.clone();
        record.primary_property_type = building.property_type.clone();
        record.primary_property_type_area = Some(floor_area.clone());
        record.gross_floor_area = Some(floor_area);
    }

    if let Some(audit) = &extracted.audit {
        record.audit_type = audit.audit_type.clone();
        record.audit_completion_date = audit.audit_date.clone();
    }

    record.ecm_description = Some(ecm.description.clone().unwrap_or_default());
    record.ecm_additional_details = ecm.notes.clone();
    record.ecm_status = Some(
        ecm.implementation_status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    );
    record.ecm_scope = Some(
        ecm.ecm_category
            .clone()
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
    );
    record.incentives = Some(Quantity::new(0.0, "USD"));
    record.ecm_lifetime = Some(
        ecm.useful_life
            .as_ref()
            .map(unit)
            .unwrap_or_else(|| Quantity::new(DEFAULT_LIFETIME_YEARS, "year")),
    );

    let mut entries = Vec::new();
    if let Some(energy) = &ecm.annual_energy_savings {
        entries.push(SavingsEntry {
            fuel_type: FuelType::Electricity,
            energy_savings: Some(unit(energy)),
            cost_savings: ecm.annual_cost_savings.as_ref().map(money),
            demand_savings: demand(ecm.annual_demand_reduction),
        });
    }

    for fuel in &ecm.savings_by_fuel {
        entries.push(SavingsEntry {
            fuel_type: fuel
                .fuel_type
                .as_deref()
                .map(FuelType::from_label)
                .unwrap_or_default(),
            energy_savings: fuel.energy_savings.as_ref().map(unit),
            cost_savings: fuel.cost_savings.as_ref().map(money),
            demand_savings: demand(fuel.demand_reduction),
        });
    }

    // Keep a reported annual cost figure that no entry ended up carrying.
    if let Some(annual_cost) = &ecm.annual_cost_savings {
        if entries.iter().all(|entry| entry.cost_savings.is_none()) {
            entries.push(SavingsEntry {
                fuel_type: FuelType::Total,
                energy_savings: None,
                cost_savings: Some(money(annual_cost)),
                demand_savings: None,
            });
        }
    }

    record.savings_entries = entries;
    record
}
