use super::domain::{ClimateZone, EcmRecord, Quantity};
use chrono::NaiveDate;
use serde::Serialize;

/// Building and audit context shared by every measure of one extraction batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingInfo {
    pub building_name: Option<String>,
    pub building_address: Option<String>,
    pub zip_code: Option<String>,
    pub primary_property_type: Option<String>,
    pub gross_floor_area: Option<Quantity>,
    pub primary_property_type_area: Option<Quantity>,
    pub climate_zone: Option<ClimateZone>,
    pub site_eui_at_audit: Option<Quantity>,
    pub audit_type: Option<String>,
    pub audit_completion_date: Option<String>,
    pub energy_star_score_at_audit: Option<f64>,
    pub audit_for_bps_compliance: Option<bool>,
    pub covered_by_bps: Option<bool>,
    pub bps_policy_name: Option<String>,
    pub has_energy_savings_target: Option<bool>,
    pub submitter_organization: Option<String>,
    pub source_filename: Option<String>,
    pub source_file_type: Option<String>,
}

impl BuildingInfo {
    /// Reads the building context from the first record; later records are trusted to agree.
    /// Returns `None` for an empty batch.
    pub fn from_records(records: &[EcmRecord]) -> Option<Self> {
        records.first().map(Self::from_record)
    }

    pub fn from_record(record: &EcmRecord) -> Self {
        Self {
            building_name: record.building_name.clone(),
            building_address: record.building_address.clone(),
            zip_code: record.zip_code.clone(),
            primary_property_type: record.primary_property_type.clone(),
            gross_floor_area: record.gross_floor_area.clone(),
            primary_property_type_area: record.primary_property_type_area.clone(),
            climate_zone: record.climate_zone.clone(),
            site_eui_at_audit: record.site_eui_at_audit.clone(),
            audit_type: record.audit_type.clone(),
            audit_completion_date: record.audit_completion_date.clone(),
            energy_star_score_at_audit: record.energy_star_score_at_audit,
            audit_for_bps_compliance: record.audit_for_bps_compliance,
            covered_by_bps: record.covered_by_bps,
            bps_policy_name: record.bps_policy_name.clone(),
            has_energy_savings_target: record.has_energy_savings_target,
            submitter_organization: record.submitter_organization.clone(),
            source_filename: record.source_filename.clone(),
            source_file_type: record.source_file_type.clone(),
        }
    }

    /// Audit completion date when it is written as `YYYY-MM-DD` (optionally followed by a time).
    pub fn audit_completed_on(&self) -> Option<NaiveDate> {
        let raw = self.audit_completion_date.as_deref()?.trim();
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Identity fields on which `other` disagrees with `self`. A field missing on either side
    /// is not a disagreement.
    pub fn differing_fields(&self, other: &Self) -> Vec<&'static str> {
        let checks: [(&'static str, &Option<String>, &Option<String>); 6] = [
            ("building_name", &self.building_name, &other.building_name),
            ("building_address", &self.building_address, &other.building_address),
            ("zip_code", &self.zip_code, &other.zip_code),
            (
                "primary_property_type",
                &self.primary_property_type,
                &other.primary_property_type,
            ),
            ("audit_type", &self.audit_type, &other.audit_type),
            (
                "audit_completion_date",
                &self.audit_completion_date,
                &other.audit_completion_date,
            ),
        ];

        checks
            .into_iter()
            .filter(|(_, ours, theirs)| !same_text(ours.as_deref(), theirs.as_deref()))
            .map(|(field, _, _)| field)
            .collect()
    }
}

fn same_text(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left.trim().eq_ignore_ascii_case(right.trim()),
        _ => true,
    }
}
