use super::report::EcmViewRow;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: usize,
    ecm_name: &'a str,
    ecm_status: &'a str,
    ecm_scope: &'a str,
    package_ids: String,
    implementation_cost: f64,
    incentives: f64,
    net_cost: f64,
    annual_cost_savings: f64,
    electricity_savings: f64,
    gas_savings: f64,
    demand_savings: f64,
    simple_payback: Option<f64>,
    ecm_lifetime_years: Option<f64>,
    lifetime_savings: Option<f64>,
}

impl<'a> From<&'a EcmViewRow> for CsvRow<'a> {
    fn from(row: &'a EcmViewRow) -> Self {
        Self {
            id: row.id,
            ecm_name: &row.ecm_name,
            ecm_status: row.ecm_status.as_deref().unwrap_or_default(),
            ecm_scope: row.ecm_scope.as_deref().unwrap_or_default(),
            package_ids: row.package_ids.join(";"),
            implementation_cost: row.implementation_cost,
            incentives: row.incentives,
            net_cost: row.net_cost,
            annual_cost_savings: row.annual_cost_savings,
            electricity_savings: row.electricity_savings,
            gas_savings: row.gas_savings,
            demand_savings: row.demand_savings,
            simple_payback: row.simple_payback.meaningful_years(),
            ecm_lifetime_years: row.ecm_lifetime_years,
            lifetime_savings: row.lifetime_savings,
        }
    }
}

/// Writes one CSV line per row with a header. Paybacks that are not meaningful stay empty.
pub fn write_rows_csv<W: Write>(rows: &[EcmViewRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(CsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::portfolio::domain::{EcmRecord, FuelType, Quantity, SavingsEntry};
    use crate::workflows::portfolio::report::derive_rows;

    #[test]
    fn writes_header_and_rows() {
        let mut paying = EcmRecord::new("Solar PV", Quantity::new(32_452.0, "USD"));
        paying.package_ids = vec!["PKG-1".to_string(), "PKG-2".to_string()];
        paying.savings_entries =
            vec![SavingsEntry::new(FuelType::Electricity).with_cost(12_640.0, "USD")];
        let idle = EcmRecord::new("Study", Quantity::new(900.0, "USD"));

        let rows = derive_rows(&[paying, idle]);
        let mut buffer = Vec::new();
        write_rows_csv(&rows, &mut buffer).expect("csv written");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,ecm_name,ecm_status"));
        assert!(lines[1].contains("PKG-1;PKG-2"));
        assert!(lines[2].starts_with("1,Study,"));
        assert!(lines[2].ends_with(",,,"));
    }

    #[test]
    fn payback_column_stays_blank_when_incentives_cover_cost() {
        let mut covered = EcmRecord::new("Rebated controls", Quantity::new(100.0, "USD"));
        covered.incentives = Some(Quantity::new(150.0, "USD"));
        covered.savings_entries =
            vec![SavingsEntry::new(FuelType::Electricity).with_cost(10.0, "USD")];

        let rows = derive_rows(&[covered]);
        let mut buffer = Vec::new();
        write_rows_csv(&rows, &mut buffer).expect("csv written");

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().expect("header row").clone();
        let column = headers
            .iter()
            .position(|name| name == "simple_payback")
            .expect("payback column");
        let record = reader
            .records()
            .next()
            .expect("one row")
            .expect("row parses");
        assert_eq!(&record[column], "");
    }
}
