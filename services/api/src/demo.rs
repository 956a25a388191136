use crate::infra::{format_currency, format_payback, format_quantity, format_share};
use clap::Args;
use ecm_insights::config::AppConfig;
use ecm_insights::error::AppError;
use ecm_insights::workflows::extraction::{ImportOutcome, RecordImporter, RejectedRecord};
use ecm_insights::workflows::portfolio::export::write_rows_csv;
use ecm_insights::workflows::portfolio::{
    BuildingInfo, EcmViewRow, PortfolioInsights, PortfolioReport, Quantity,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

const SAMPLE_AUDIT: &str =
    include_str!("../../../crates/ecm-insights/fixtures/sample_audit.json");

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Record batch to read: a JSON array, a single record, or a `{"records": [...]}` envelope
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Treat the input as raw extraction model output instead of plain JSON
    #[arg(long)]
    pub(crate) llm_response: bool,
    /// Reject the whole batch on the first invalid record
    #[arg(long)]
    pub(crate) strict: bool,
    /// Print the report as pretty JSON instead of tables
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the measure rows to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the sample report as pretty JSON instead of tables
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the sample measure rows to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    report: &'a PortfolioReport,
    insights: &'a PortfolioInsights,
    skipped: &'a [RejectedRecord],
}

#[derive(Debug, Clone, Tabled)]
struct MeasureLine {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Measure")]
    name: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Incentives")]
    incentives: String,
    #[tabled(rename = "Net Cost")]
    net_cost: String,
    #[tabled(rename = "Annual Savings")]
    annual_savings: String,
    #[tabled(rename = "Payback")]
    payback: String,
    #[tabled(rename = "Lifetime Savings")]
    lifetime_savings: String,
}

impl From<&EcmViewRow> for MeasureLine {
    fn from(row: &EcmViewRow) -> Self {
        Self {
            id: row.id,
            name: row.ecm_name.clone(),
            scope: row.ecm_scope.clone().unwrap_or_default(),
            cost: format_currency(row.implementation_cost),
            incentives: format_currency(row.incentives),
            net_cost: format_currency(row.net_cost),
            annual_savings: format_currency(row.annual_cost_savings),
            payback: format_payback(row.simple_payback),
            lifetime_savings: row
                .lifetime_savings
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        llm_response,
        strict,
        json,
        csv,
    } = args;

    let mut import = AppConfig::load()?.import;
    import.strict |= strict;
    let importer = RecordImporter::new(import);

    let outcome = if llm_response {
        let text = std::fs::read_to_string(&input)?;
        importer.from_llm_response(&text)?
    } else {
        importer.from_path(&input)?
    };

    emit(&outcome, json, csv.as_deref())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let outcome = RecordImporter::default().from_slice(SAMPLE_AUDIT.as_bytes())?;
    if !args.json {
        println!("ECM insights demo: bundled four-measure sample audit");
    }
    emit(&outcome, args.json, args.csv.as_deref())
}

fn emit(outcome: &ImportOutcome, json: bool, csv: Option<&Path>) -> Result<(), AppError> {
    let report = outcome.report();
    let insights = report.insights();

    if json {
        let output = ReportOutput {
            report: &report,
            insights: &insights,
            skipped: &outcome.rejected,
        };
        let rendered = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&report, &insights, &outcome.rejected);
    }

    if let Some(path) = csv {
        let writer = BufWriter::new(File::create(path)?);
        write_rows_csv(&report.rows, writer)?;
        if !json {
            println!(
                "\nWrote {} measure row(s) to {}",
                report.rows.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn render_report(
    report: &PortfolioReport,
    insights: &PortfolioInsights,
    skipped: &[RejectedRecord],
) {
    match &report.building {
        Some(building) => render_building(building),
        None => println!("\nNo building context: the batch holds no measures"),
    }

    println!("\nMeasures");
    let lines: Vec<MeasureLine> = report.rows.iter().map(MeasureLine::from).collect();
    if lines.is_empty() {
        println!("(no rows)");
    } else {
        println!("{}", Table::new(lines).with(Style::markdown()));
    }

    let summary = &report.summary;
    println!("\nPortfolio summary ({} measure(s))", summary.measure_count);
    println!(
        "- Implementation cost {} | incentives {} | net cost {}",
        format_currency(summary.total_implementation_cost),
        format_currency(summary.total_incentives),
        format_currency(summary.total_net_cost)
    );
    println!(
        "- Annual cost savings {} | lifetime savings {}",
        format_currency(summary.total_annual_savings),
        format_currency(summary.total_lifetime_savings)
    );
    println!(
        "- Electricity {} | natural gas {} | demand {}",
        format_quantity(summary.total_electricity_savings, "kWh"),
        format_quantity(summary.total_gas_savings, "therms"),
        format_quantity(summary.total_demand_savings, "kW")
    );
    println!(
        "- Average payback {} | cost-weighted payback {}",
        format_payback(summary.average_payback),
        format_payback(summary.portfolio_payback)
    );

    println!("\nInsights");
    if let Some(measure) = &insights.quickest_payback {
        println!(
            "- Quickest payback: {} ({})",
            measure.ecm_name,
            format_payback(measure.simple_payback)
        );
    }
    if let Some(measure) = &insights.largest_savings {
        println!(
            "- Largest savings: {} ({} / yr, {} of portfolio)",
            measure.ecm_name,
            format_currency(measure.annual_cost_savings),
            format_share(measure.savings_share)
        );
    }
    for observation in &insights.observations {
        println!("- {observation}");
    }

    if !report.warnings.is_empty() {
        println!("\nData quality warnings");
        for warning in &report.warnings {
            println!(
                "- [{}] element {} {}: {}",
                warning.kind_label, warning.source_index, warning.ecm_name, warning.detail
            );
        }
    }

    if !skipped.is_empty() {
        println!("\nSkipped records");
        for record in skipped {
            println!("- element {}: {}", record.index, record.reason);
        }
    }
}

fn render_building(building: &BuildingInfo) {
    println!(
        "\nBuilding: {}",
        building.building_name.as_deref().unwrap_or("(unnamed)")
    );
    if let Some(address) = &building.building_address {
        match &building.zip_code {
            Some(zip) => println!("- Address: {address} {zip}"),
            None => println!("- Address: {address}"),
        }
    }
    if let Some(property_type) = &building.primary_property_type {
        let area = building
            .gross_floor_area
            .as_ref()
            .map(|Quantity { value, unit }| format!(" ({})", format_quantity(*value, unit)))
            .unwrap_or_default();
        println!("- Property type: {property_type}{area}");
    }
    if let Some(audit_type) = &building.audit_type {
        let completed = building
            .audit_completed_on()
            .map(|date| format!(", completed {}", date.format("%b %-d, %Y")))
            .unwrap_or_default();
        println!("- Audit: {audit_type}{completed}");
    }
    if let Some(code) = building.climate_zone.as_ref().and_then(|zone| zone.code.as_deref()) {
        let scheme = building
            .climate_zone
            .as_ref()
            .and_then(|zone| zone.scheme.as_deref())
            .unwrap_or("climate zone");
        println!("- Climate zone: {scheme} {code}");
    }
}
