use ecm_insights::workflows::extraction::RecordImporter;
use ecm_insights::workflows::portfolio::report::derive_rows;
use ecm_insights::workflows::portfolio::{
    EcmRecord, FuelType, Payback, PortfolioReport, Quantity, SavingsEntry, WarningKind,
};

fn sample_records() -> Vec<EcmRecord> {
    let data = include_bytes!("../fixtures/sample_audit.json");
    let outcome = RecordImporter::default()
        .from_slice(&data[..])
        .expect("sample audit imports");
    assert!(outcome.rejected.is_empty());
    outcome.records
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

fn years(payback: Payback) -> f64 {
    payback.years().expect("payback in years")
}

#[test]
fn sample_audit_produces_expected_rows_and_totals() {
    let records = sample_records();
    let report = PortfolioReport::build(&records);

    let names: Vec<&str> = report.rows.iter().map(|row| row.ecm_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Roof Replacement",
            "LED Lighting Retrofit",
            "VRF Heat Pump Conversion",
            "Rooftop Solar PV"
        ]
    );

    let paybacks: Vec<f64> = report
        .rows
        .iter()
        .map(|row| years(row.simple_payback))
        .collect();
    assert_close(paybacks[0], 149.98, 0.01);
    assert_close(paybacks[1], 2.46, 0.01);
    assert_close(paybacks[2], 34.67, 0.05);
    assert_close(paybacks[3], 2.57, 0.01);

    let summary = &report.summary;
    assert_eq!(summary.measure_count, 4);
    assert_close(summary.total_implementation_cost, 634_362.0, 1e-6);
    assert_close(summary.total_annual_savings, 21_847.0, 1e-6);
    assert_close(summary.total_incentives, 294_878.0, 1e-6);
    assert_close(summary.total_net_cost, 339_484.0, 1e-6);
    assert_close(summary.total_electricity_savings, 192_050.0, 1e-6);
    assert_close(summary.total_gas_savings, -1_240.0, 1e-6);
    assert_close(summary.total_demand_savings, 20.7, 1e-9);
    assert_close(summary.total_lifetime_savings, 494_240.0, 1e-6);
    assert_close(years(summary.average_payback), 47.42, 0.02);
    assert_close(years(summary.portfolio_payback), 15.54, 0.01);

    assert!(report.warnings.is_empty());
}

#[test]
fn sample_audit_building_context_comes_from_first_record() {
    let report = PortfolioReport::build(&sample_records());
    let building = report.building.expect("building context present");

    assert_eq!(
        building.building_name.as_deref(),
        Some("Riverside Community Center")
    );
    assert_eq!(building.zip_code.as_deref(), Some("62704"));
    assert_eq!(
        building.gross_floor_area,
        Some(Quantity::new(48_200.0, "sf"))
    );
    assert_eq!(
        building.audit_completed_on(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
    );
}

#[test]
fn sample_audit_insights_rank_measures() {
    let report = PortfolioReport::build(&sample_records());
    let insights = report.insights();

    let ranking: Vec<usize> = insights
        .payback_ranking
        .iter()
        .map(|measure| measure.id)
        .collect();
    assert_eq!(ranking, vec![1, 3, 2, 0]);

    let quickest = insights.quickest_payback.expect("quickest payback");
    assert_eq!(quickest.ecm_name, "LED Lighting Retrofit");

    let largest = insights.largest_savings.expect("largest savings");
    assert_eq!(largest.ecm_name, "Rooftop Solar PV");
    assert_close(largest.savings_share, 12_640.0 / 21_847.0, 1e-9);

    assert_eq!(insights.quick_wins.len(), 2);
    assert_eq!(insights.pays_back_within_lifetime, 2);
    assert_eq!(insights.meaningful_payback_count, 4);
}

#[test]
fn total_entry_overrides_fuel_entries() {
    let mut record = EcmRecord::new("Chiller", Quantity::new(1_000.0, "USD"));
    record.savings_entries = vec![
        SavingsEntry::new(FuelType::Electricity).with_cost(900.0, "USD"),
        SavingsEntry::new(FuelType::Total).with_cost(250.0, "USD"),
    ];

    let rows = derive_rows(&[record]);
    assert_eq!(rows[0].annual_cost_savings, 250.0);
}

#[test]
fn missing_total_sums_fuel_costs() {
    let mut record = EcmRecord::new("Envelope", Quantity::new(1_000.0, "USD"));
    record.savings_entries = vec![
        SavingsEntry::new(FuelType::Electricity).with_cost(100.0, "USD"),
        SavingsEntry::new(FuelType::NaturalGas).with_cost(50.0, "USD"),
    ];

    let rows = derive_rows(&[record]);
    assert_eq!(rows[0].annual_cost_savings, 150.0);
}

#[test]
fn record_without_entries_has_zero_savings() {
    let rows = derive_rows(&[EcmRecord::new("Study", Quantity::new(500.0, "USD"))]);
    let row = &rows[0];

    assert_eq!(row.annual_cost_savings, 0.0);
    assert_eq!(row.electricity_savings, 0.0);
    assert_eq!(row.gas_savings, 0.0);
    assert_eq!(row.demand_savings, 0.0);
    assert_eq!(row.simple_payback, Payback::NotApplicable);
    assert!(row.simple_payback.as_f64().is_infinite());
}

#[test]
fn negative_net_cost_keeps_negative_payback_and_warns() {
    let mut record = EcmRecord::new("Utility program", Quantity::new(1_000.0, "USD"));
    record.incentives = Some(Quantity::new(1_500.0, "USD"));
    record.savings_entries = vec![SavingsEntry::new(FuelType::Electricity).with_cost(100.0, "USD")];

    let report = PortfolioReport::build(&[record]);
    assert_eq!(report.rows[0].simple_payback, Payback::Years(-5.0));
    assert_eq!(report.summary.average_payback, Payback::NotApplicable);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::NegativeNetCost);
}

#[test]
fn average_skips_measures_without_savings() {
    let build = |name: &str, savings: Option<f64>| {
        let mut record = EcmRecord::new(name, Quantity::new(1_000.0, "USD"));
        if let Some(savings) = savings {
            record.savings_entries =
                vec![SavingsEntry::new(FuelType::Electricity).with_cost(savings, "USD")];
        }
        record
    };

    let report = PortfolioReport::build(&[
        build("Two years", Some(500.0)),
        build("Never", None),
        build("Four years", Some(250.0)),
    ]);
    assert_eq!(report.summary.average_payback, Payback::Years(3.0));

    let none_pay_back = PortfolioReport::build(&[build("Never", None), build("Still never", None)]);
    assert_eq!(none_pay_back.summary.average_payback, Payback::NotApplicable);
    assert!(none_pay_back.summary.average_payback.as_f64().is_infinite());
}

#[test]
fn rows_follow_input_order_and_pipeline_is_repeatable() {
    let mut records = sample_records();
    records.reverse();
    let snapshot = records.clone();

    let first = PortfolioReport::build(&records);
    let second = PortfolioReport::build(&records);

    assert_eq!(first, second);
    assert_eq!(records, snapshot);
    for (position, row) in first.rows.iter().enumerate() {
        assert_eq!(row.id, position);
        assert_eq!(row.ecm_name, records[position].ecm_name);
    }
}

#[test]
fn empty_batch_yields_empty_report() {
    let report = PortfolioReport::build(&[]);

    assert!(report.building.is_none());
    assert!(report.rows.is_empty());
    assert_eq!(report.summary.total_annual_savings, 0.0);
    assert_eq!(report.summary.average_payback, Payback::NotApplicable);
    assert!(report.insights().quickest_payback.is_none());
}

#[test]
fn report_serializes_not_applicable_payback_as_null() {
    let report = PortfolioReport::build(&[EcmRecord::new("Study", Quantity::new(500.0, "USD"))]);
    let json = serde_json::to_value(&report).expect("report serializes");

    assert!(json["rows"][0]["simple_payback"].is_null());
    assert!(json["summary"]["average_payback"].is_null());
}
