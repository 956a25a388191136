use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A numeric value paired with the unit it was reported in (`USD`, `kWh`, `therm`, `kW`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// The value when the unit reads as years (or is missing). Other units yield `None`;
    /// no conversion is attempted.
    pub fn years(&self) -> Option<f64> {
        let unit = self.unit.trim().to_ascii_lowercase();
        let is_years = unit.is_empty() || unit.starts_with("yr") || unit.starts_with("year");
        (is_years && self.value.is_finite()).then_some(self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateZone {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Energy commodity a savings figure applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FuelType {
    Electricity,
    NaturalGas,
    /// Combined row whose cost savings is authoritative across fuels.
    Total,
    Other(String),
    #[default]
    Unspecified,
}

impl FuelType {
    /// Maps a free-text label onto a fuel type, ignoring case and spacing.
    pub fn from_label(label: &str) -> Self {
        let normalized = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" => Self::Unspecified,
            "electricity" => Self::Electricity,
            "natural gas" => Self::NaturalGas,
            "total" => Self::Total,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Electricity => "Electricity",
            Self::NaturalGas => "Natural Gas",
            Self::Total => "Total",
            Self::Other(label) => label,
            Self::Unspecified => "",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("Unspecified"),
            other => f.write_str(other.label()),
        }
    }
}

impl Serialize for FuelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unspecified => serializer.serialize_none(),
            other => serializer.serialize_str(other.label()),
        }
    }
}

impl<'de> Deserialize<'de> for FuelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Self::from_label).unwrap_or_default())
    }
}

/// Savings reported for one fuel type of one measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEntry {
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_savings: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_savings: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_savings: Option<Quantity>,
}

impl SavingsEntry {
    pub fn new(fuel_type: FuelType) -> Self {
        Self {
            fuel_type,
            energy_savings: None,
            cost_savings: None,
            demand_savings: None,
        }
    }

    pub fn with_energy(mut self, value: f64, unit: &str) -> Self {
        self.energy_savings = Some(Quantity::new(value, unit));
        self
    }

    pub fn with_cost(mut self, value: f64, unit: &str) -> Self {
        self.cost_savings = Some(Quantity::new(value, unit));
        self
    }

    pub fn with_demand(mut self, value: f64, unit: &str) -> Self {
        self.demand_savings = Some(Quantity::new(value, unit));
        self
    }
}

/// One energy conservation measure as extracted from an audit report.
///
/// Building and audit fields are repeated on every record of a batch; only the first
/// record's copy is read when the building context is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcmRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_address: Option<String>,
    #[serde(
        default,
        deserialize_with = "postal_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_floor_area: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_property_type_area: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate_zone: Option<ClimateZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_eui_at_audit: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_star_score_at_audit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_for_bps_compliance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_by_bps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bps_policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_energy_savings_target: Option<bool>,

    pub ecm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecm_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecm_additional_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecm_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecm_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_identified: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_ids: Vec<String>,

    pub implementation_cost: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incentives: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecm_lifetime: Option<Quantity>,

    #[serde(default)]
    pub savings_entries: Vec<SavingsEntry>,
}

impl EcmRecord {
    /// Bare record carrying only the required fields.
    pub fn new(ecm_name: impl Into<String>, implementation_cost: Quantity) -> Self {
        Self {
            submitter_organization: None,
            source_filename: None,
            source_file_type: None,
            building_name: None,
            building_address: None,
            zip_code: None,
            primary_property_type: None,
            gross_floor_area: None,
            primary_property_type_area: None,
            climate_zone: None,
            site_eui_at_audit: None,
            audit_type: None,
            audit_completion_date: None,
            energy_star_score_at_audit: None,
            audit_for_bps_compliance: None,
            covered_by_bps: None,
            bps_policy_name: None,
            has_energy_savings_target: None,
            ecm_name: ecm_name.into(),
            ecm_description: None,
            ecm_additional_details: None,
            ecm_status: None,
            ecm_scope: None,
            date_identified: None,
            package_ids: Vec::new(),
            implementation_cost,
            incentives: None,
            ecm_lifetime: None,
            savings_entries: Vec::new(),
        }
    }

    pub fn incentive_value(&self) -> f64 {
        self.incentives.as_ref().map_or(0.0, |quantity| quantity.value)
    }

    pub fn lifetime_years(&self) -> Option<f64> {
        self.ecm_lifetime.as_ref().and_then(Quantity::years)
    }

    /// Checks the numeric invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), RecordViolation> {
        if self.ecm_name.trim().is_empty() {
            return Err(RecordViolation::MissingName);
        }

        let cost = self.implementation_cost.value;
        if !cost.is_finite() || cost < 0.0 {
            return Err(RecordViolation::InvalidImplementationCost(cost));
        }

        if let Some(incentives) = &self.incentives {
            if !incentives.value.is_finite() || incentives.value < 0.0 {
                return Err(RecordViolation::InvalidIncentives(incentives.value));
            }
        }

        for entry in &self.savings_entries {
            let quantities = [
                &entry.energy_savings,
                &entry.cost_savings,
                &entry.demand_savings,
            ];
            if quantities
                .into_iter()
                .flatten()
                .any(|quantity| !quantity.value.is_finite())
            {
                return Err(RecordViolation::NonFiniteSavings(entry.fuel_type.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordViolation {
    #[error("ecm_name is blank")]
    MissingName,
    #[error("implementation_cost must be a finite, non-negative amount (got {0})")]
    InvalidImplementationCost(f64),
    #[error("incentives must be a finite, non-negative amount (got {0})")]
    InvalidIncentives(f64),
    #[error("savings entry for fuel type '{0}' carries a non-finite value")]
    NonFiniteSavings(FuelType),
}

/// Accepts a postal code written as text, a number, or a `{value, unit}` pair.
fn postal_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPostalCode {
        Text(String),
        Number(serde_json::Number),
        Quantity { value: serde_json::Value },
    }

    let raw = Option::<RawPostalCode>::deserialize(deserializer)?;
    let code = match raw {
        None => None,
        Some(RawPostalCode::Text(text)) => Some(text),
        Some(RawPostalCode::Number(number)) => Some(number.to_string()),
        Some(RawPostalCode::Quantity { value }) => match value {
            serde_json::Value::String(text) => Some(text),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        },
    };

    Ok(code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty() && code != "0"))
}
