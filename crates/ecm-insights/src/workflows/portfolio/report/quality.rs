use super::super::building::BuildingInfo;
use super::super::domain::EcmRecord;
use super::super::savings::duplicate_fuel_types;
use super::rows::EcmViewRow;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    BuildingMismatch,
    DuplicateFuelType,
    NegativeNetCost,
}

impl WarningKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BuildingMismatch => "Building mismatch",
            Self::DuplicateFuelType => "Duplicate fuel type",
            Self::NegativeNetCost => "Negative net cost",
        }
    }
}

/// Issue in the extracted data that the pipeline tolerates but the reader should see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityWarning {
    pub record_id: usize,
    /// Position in the submitted batch; see [`EcmViewRow::source_index`].
    pub source_index: usize,
    pub ecm_name: String,
    pub kind: WarningKind,
    pub kind_label: &'static str,
    pub detail: String,
}

impl DataQualityWarning {
    fn new(record_id: usize, ecm_name: &str, kind: WarningKind, detail: String) -> Self {
        Self {
            record_id,
            source_index: record_id,
            ecm_name: ecm_name.to_string(),
            kind,
            kind_label: kind.label(),
            detail,
        }
    }
}

pub(crate) fn collect_warnings(
    records: &[EcmRecord],
    building: Option<&BuildingInfo>,
    rows: &[EcmViewRow],
) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();

    for (id, record) in records.iter().enumerate() {
        if let Some(building) = building {
            let fields = building.differing_fields(&BuildingInfo::from_record(record));
            if !fields.is_empty() {
                tracing::warn!(
                    record = id,
                    ecm_name = %record.ecm_name,
                    fields = %fields.join(", "),
                    "building context disagrees with the first record"
                );
                warnings.push(DataQualityWarning::new(
                    id,
                    &record.ecm_name,
                    WarningKind::BuildingMismatch,
                    format!(
                        "{} differ(s) from the first record; the first record's values are used",
                        fields.join(", ")
                    ),
                ));
            }
        }

        let duplicates = duplicate_fuel_types(&record.savings_entries);
        if !duplicates.is_empty() {
            let labels: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
            warnings.push(DataQualityWarning::new(
                id,
                &record.ecm_name,
                WarningKind::DuplicateFuelType,
                format!(
                    "{} listed more than once; cost savings may be double counted",
                    labels.join(", ")
                ),
            ));
        }
    }

    for row in rows.iter().filter(|row| row.net_cost < 0.0) {
        warnings.push(DataQualityWarning::new(
            row.id,
            &row.ecm_name,
            WarningKind::NegativeNetCost,
            format!(
                "incentives of {:.2} exceed the implementation cost of {:.2}",
                row.incentives, row.implementation_cost
            ),
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::portfolio::domain::{FuelType, Quantity, SavingsEntry};
    use crate::workflows::portfolio::report::rows::derive_rows;

    #[test]
    fn flags_each_kind_of_issue() {
        let mut first = EcmRecord::new("Roof", Quantity::new(100.0, "USD"));
        first.building_name = Some("Hall A".to_string());

        let mut second = EcmRecord::new("Rebate", Quantity::new(100.0, "USD"));
        second.building_name = Some("Hall B".to_string());
        second.incentives = Some(Quantity::new(150.0, "USD"));
        second.savings_entries = vec![
            SavingsEntry::new(FuelType::Electricity).with_cost(10.0, "USD"),
            SavingsEntry::new(FuelType::Electricity).with_cost(12.0, "USD"),
        ];

        let records = vec![first, second];
        let building = BuildingInfo::from_records(&records);
        let rows = derive_rows(&records);
        let warnings = collect_warnings(&records, building.as_ref(), &rows);

        let kinds: Vec<_> = warnings.iter().map(|warning| warning.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::BuildingMismatch,
                WarningKind::DuplicateFuelType,
                WarningKind::NegativeNetCost
            ]
        );
        assert!(warnings.iter().all(|warning| warning.record_id == 1));
        assert!(warnings[0].detail.contains("building_name"));
        assert!(warnings[1].detail.contains("Electricity"));
    }

    #[test]
    fn clean_batch_has_no_warnings() {
        let records = vec![EcmRecord::new("Roof", Quantity::new(100.0, "USD"))];
        let rows = derive_rows(&records);
        let building = BuildingInfo::from_records(&records);
        assert!(collect_warnings(&records, building.as_ref(), &rows).is_empty());
    }
}
