use serde::{Serialize, Serializer};
use std::fmt;

/// Simple payback period of a measure or a portfolio.
///
/// `NotApplicable` covers measures without positive annual savings. Negative paybacks
/// (incentives above cost) stay `Years` but are not meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payback {
    Years(f64),
    NotApplicable,
}

impl Payback {
    /// Wraps a ratio, mapping non-finite values to `NotApplicable`.
    pub fn from_years(years: f64) -> Self {
        if years.is_finite() {
            Self::Years(years)
        } else {
            Self::NotApplicable
        }
    }

    pub fn years(self) -> Option<f64> {
        match self {
            Self::Years(years) => Some(years),
            Self::NotApplicable => None,
        }
    }

    /// Positive, finite years. Anything else renders as "N/A".
    pub fn meaningful_years(self) -> Option<f64> {
        self.years().filter(|years| *years > 0.0)
    }

    pub fn is_meaningful(self) -> bool {
        self.meaningful_years().is_some()
    }

    /// Numeric form with `+inf` standing in for `NotApplicable`.
    pub fn as_f64(self) -> f64 {
        self.years().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meaningful_years() {
            Some(years) => write!(f, "{years:.1} yrs"),
            None => f.write_str("N/A"),
        }
    }
}

impl Serialize for Payback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Years(years) => serializer.serialize_f64(*years),
            Self::NotApplicable => serializer.serialize_none(),
        }
    }
}

/// Economics of one measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialMetrics {
    pub net_cost: f64,
    pub simple_payback: Payback,
    pub lifetime_savings: Option<f64>,
}

impl FinancialMetrics {
    pub fn compute(
        implementation_cost: f64,
        incentives: Option<f64>,
        annual_cost_savings: f64,
        lifetime_years: Option<f64>,
    ) -> Self {
        let net_cost = net_cost(implementation_cost, incentives);
        Self {
            net_cost,
            simple_payback: simple_payback(net_cost, annual_cost_savings),
            lifetime_savings: lifetime_savings(annual_cost_savings, lifetime_years),
        }
    }
}

/// Cost after incentives. Negative when incentives exceed the cost.
pub fn net_cost(implementation_cost: f64, incentives: Option<f64>) -> f64 {
    implementation_cost - incentives.unwrap_or(0.0)
}

pub fn simple_payback(net_cost: f64, annual_cost_savings: f64) -> Payback {
    if annual_cost_savings > 0.0 {
        Payback::from_years(net_cost / annual_cost_savings)
    } else {
        Payback::NotApplicable
    }
}

pub fn lifetime_savings(annual_cost_savings: f64, lifetime_years: Option<f64>) -> Option<f64> {
    lifetime_years.map(|years| annual_cost_savings * years)
}
