use ecm_insights::workflows::portfolio::Payback;
use metrics_exporter_prometheus::PrometheusHandle;
use num_format::{Locale, ToFormattedString};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Whole-dollar amount with thousands separators, e.g. `$634,362`.
pub(crate) fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_formatted_string(&Locale::en);
    if rounded < 0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Rounded quantity with thousands separators and a unit suffix.
pub(crate) fn format_quantity(value: f64, unit: &str) -> String {
    let rounded = (value.round() as i64).to_formatted_string(&Locale::en);
    if unit.is_empty() {
        rounded
    } else {
        format!("{rounded} {unit}")
    }
}

pub(crate) fn format_payback(payback: Payback) -> String {
    payback.to_string()
}

pub(crate) fn format_share(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}
