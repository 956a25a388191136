//! Nested record shape requested from the extraction model: submission, building, measure
//! and audit blocks, each optional except the measure itself.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoneyQuantity {
    pub value: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitQuantity {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FuelSavings {
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub energy_savings: Option<UnitQuantity>,
    #[serde(default)]
    pub cost_savings: Option<MoneyQuantity>,
    /// Peak demand reduction in kW.
    #[serde(default)]
    pub demand_reduction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingSnapshot {
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub gross_floor_area: Option<UnitQuantity>,
    #[serde(default)]
    pub year_built: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditInfo {
    #[serde(default)]
    pub audit_date: Option<String>,
    #[serde(default)]
    pub auditor_name: Option<String>,
    #[serde(default)]
    pub audit_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EcmDetail {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ecm_category: Option<String>,
    #[serde(default)]
    pub cost_estimate: Option<MoneyQuantity>,
    #[serde(default)]
    pub annual_cost_savings: Option<MoneyQuantity>,
    #[serde(default)]
    pub simple_payback: Option<UnitQuantity>,
    #[serde(default)]
    pub annual_energy_savings: Option<UnitQuantity>,
    #[serde(default)]
    pub annual_demand_reduction: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub savings_by_fuel: Vec<FuelSavings>,
    #[serde(default)]
    pub implementation_status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub useful_life: Option<UnitQuantity>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(default)]
    pub source_filename: Option<String>,
    #[serde(default)]
    pub extraction_date: Option<String>,
    #[serde(default)]
    pub extracted_by: Option<String>,
}

/// One measure as returned by the extraction model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedEcm {
    #[serde(default)]
    pub submission: Option<SubmissionMetadata>,
    #[serde(default)]
    pub building: Option<BuildingSnapshot>,
    pub ecm: EcmDetail,
    #[serde(default)]
    pub audit: Option<AuditInfo>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
