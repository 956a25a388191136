//! Turns extraction output (flat record arrays, API envelopes, or raw model responses in the
//! nested extraction schema) into validated [`EcmRecord`] batches.

mod flatten;
mod response;
pub mod schema;

pub use flatten::flatten;
pub use schema::ExtractedEcm;

use crate::config::ImportConfig;
use crate::workflows::portfolio::{EcmRecord, PortfolioReport};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read record batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("record batch is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("extraction response is empty")]
    EmptyResponse,
    #[error("expected an array of records, a single record, or an object with a `records` array")]
    UnexpectedShape,
    #[error("batch holds {count} records, above the limit of {limit}")]
    TooManyRecords { count: usize, limit: usize },
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Element of a batch that was left out in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub records: Vec<EcmRecord>,
    /// Batch position of each accepted record, parallel to `records`.
    pub source_indexes: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRecord>,
}

impl ImportOutcome {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Builds the portfolio report with rows and warnings pointing at batch positions, so they
    /// share one numbering with `rejected`.
    pub fn report(&self) -> PortfolioReport {
        PortfolioReport::build(&self.records).with_source_indexes(&self.source_indexes)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordImporter {
    config: ImportConfig,
}

impl RecordImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ImportConfig {
        self.config
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<ImportOutcome, ImportError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(file)
    }

    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<ImportOutcome, ImportError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.from_slice(&buffer)
    }

    /// Parses a JSON batch: an array of records, one record, or a `{"records": [...]}` envelope.
    pub fn from_slice(&self, bytes: &[u8]) -> Result<ImportOutcome, ImportError> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.from_value(value)
    }

    /// Parses raw model output, tolerating prose and code fences around the JSON.
    pub fn from_llm_response(&self, response: &str) -> Result<ImportOutcome, ImportError> {
        let payload = response::json_payload(response);
        if payload.is_empty() {
            return Err(ImportError::EmptyResponse);
        }

        let value: Value = serde_json::from_str(payload)?;
        self.from_value(value)
    }

    pub fn from_value(&self, value: Value) -> Result<ImportOutcome, ImportError> {
        let elements = batch_elements(value)?;
        if elements.len() > self.config.max_records {
            return Err(ImportError::TooManyRecords {
                count: elements.len(),
                limit: self.config.max_records,
            });
        }

        let mut records = Vec::with_capacity(elements.len());
        let mut source_indexes = Vec::with_capacity(elements.len());
        let mut rejected = Vec::new();

        for (index, element) in elements.into_iter().enumerate() {
            match parse_element(element) {
                Ok(record) => {
                    records.push(record);
                    source_indexes.push(index);
                }
                Err(reason) if self.config.strict => {
                    return Err(ImportError::InvalidRecord { index, reason });
                }
                Err(reason) => {
                    warn!(index, %reason, "skipping invalid ECM record");
                    rejected.push(RejectedRecord { index, reason });
                }
            }
        }

        debug!(
            accepted = records.len(),
            rejected = rejected.len(),
            "imported ECM record batch"
        );

        Ok(ImportOutcome {
            records,
            source_indexes,
            rejected,
        })
    }
}

fn batch_elements(value: Value) -> Result<Vec<Value>, ImportError> {
    match value {
        Value::Array(elements) => Ok(elements),
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(elements)) => Ok(elements),
            Some(_) => Err(ImportError::UnexpectedShape),
            None => Ok(vec![Value::Object(object)]),
        },
        _ => Err(ImportError::UnexpectedShape),
    }
}

/// Elements carrying an `ecm` object use the nested extraction schema; anything else is read
/// as a flat record.
fn parse_element(element: Value) -> Result<EcmRecord, String> {
    let nested = element
        .as_object()
        .is_some_and(|object| object.get("ecm").is_some_and(Value::is_object));

    let record = if nested {
        let extracted: ExtractedEcm =
            serde_json::from_value(element).map_err(|err| err.to_string())?;
        flatten(&extracted)
    } else {
        serde_json::from_value::<EcmRecord>(element).map_err(|err| err.to_string())?
    };

    record.validate().map_err(|violation| violation.to_string())?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(name: &str, cost: f64) -> Value {
        json!({ "ecm_name": name, "implementation_cost": { "value": cost, "unit": "USD" } })
    }

    #[test]
    fn accepts_array_single_object_and_envelope() {
        let importer = RecordImporter::default();

        let array = importer
            .from_value(json!([flat("A", 1.0), flat("B", 2.0)]))
            .expect("array imports");
        assert_eq!(array.record_count(), 2);

        let single = importer.from_value(flat("C", 3.0)).expect("object imports");
        assert_eq!(single.records[0].ecm_name, "C");

        let envelope = importer
            .from_value(json!({ "records": [flat("D", 4.0)], "record_count": 1 }))
            .expect("envelope imports");
        assert_eq!(envelope.records[0].ecm_name, "D");
    }

    #[test]
    fn rejects_scalars_and_bad_envelopes() {
        let importer = RecordImporter::default();
        assert!(matches!(
            importer.from_value(json!(42)),
            Err(ImportError::UnexpectedShape)
        ));
        assert!(matches!(
            importer.from_value(json!({ "records": "none" })),
            Err(ImportError::UnexpectedShape)
        ));
    }

    #[test]
    fn lenient_mode_skips_invalid_records() {
        let importer = RecordImporter::default();
        let outcome = importer
            .from_value(json!([
                flat("Good", 10.0),
                { "ecm_name": "No cost" },
                flat("Negative", -3.0),
            ]))
            .expect("lenient import succeeds");

        assert_eq!(outcome.record_count(), 1);
        assert_eq!(outcome.source_indexes, vec![0]);
        let indexes: Vec<_> = outcome.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert!(outcome.rejected[1].reason.contains("implementation_cost"));
    }

    #[test]
    fn report_numbers_rows_by_batch_position() {
        let outcome = RecordImporter::default()
            .from_value(json!([
                { "ecm_name": "Broken" },
                flat("LED", 1000.0),
                flat("Rebate", 100.0),
            ]))
            .expect("lenient import succeeds");
        assert_eq!(outcome.source_indexes, vec![1, 2]);
        assert_eq!(outcome.rejected[0].index, 0);

        let mut records = outcome.records.clone();
        records[1].incentives = Some(crate::workflows::portfolio::Quantity::new(150.0, "USD"));
        let adjusted = ImportOutcome {
            records,
            ..outcome
        };
        let report = adjusted.report();

        let rows: Vec<_> = report
            .rows
            .iter()
            .map(|row| (row.id, row.source_index))
            .collect();
        assert_eq!(rows, vec![(0, 1), (1, 2)]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].record_id, 1);
        assert_eq!(report.warnings[0].source_index, 2);
    }

    #[test]
    fn strict_mode_fails_on_first_invalid_record() {
        let importer = RecordImporter::new(ImportConfig {
            strict: true,
            ..ImportConfig::default()
        });
        let error = importer
            .from_value(json!([flat("Good", 10.0), flat("   ", 5.0)]))
            .expect_err("strict import fails");

        match error {
            ImportError::InvalidRecord { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("ecm_name"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn enforces_batch_limit() {
        let importer = RecordImporter::new(ImportConfig {
            strict: false,
            max_records: 1,
        });
        assert!(matches!(
            importer.from_value(json!([flat("A", 1.0), flat("B", 1.0)])),
            Err(ImportError::TooManyRecords { count: 2, limit: 1 })
        ));
    }

    #[test]
    fn llm_response_with_nested_schema_is_flattened() {
        let response = "Sure! Here are the measures:\n```json\n[\n  {\"ecm\": {\"name\": \"VFD on AHU-1\", \"cost_estimate\": {\"value\": 8000}}}\n]\n```";
        let outcome = RecordImporter::default()
            .from_llm_response(response)
            .expect("response imports");

        assert_eq!(outcome.record_count(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.ecm_name, "VFD on AHU-1");
        assert_eq!(record.implementation_cost.value, 8000.0);
        assert_eq!(record.implementation_cost.unit, "USD");
    }

    #[test]
    fn blank_llm_response_is_an_error() {
        assert!(matches!(
            RecordImporter::default().from_llm_response("  \n "),
            Err(ImportError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let error = RecordImporter::default()
            .from_path("./does-not-exist.json")
            .expect_err("expected io error");
        assert!(matches!(error, ImportError::Io(_)));
    }
}
