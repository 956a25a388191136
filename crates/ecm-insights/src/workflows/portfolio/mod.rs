//! Building-audit portfolio pipeline: records in, building context, per-measure rows,
//! portfolio totals and insights out. Every step is a pure function of its input.

pub mod building;
pub mod domain;
pub mod export;
pub mod financial;
pub mod report;
pub mod router;
pub mod savings;

pub use building::BuildingInfo;
pub use domain::{ClimateZone, EcmRecord, FuelType, Quantity, RecordViolation, SavingsEntry};
pub use financial::{FinancialMetrics, Payback};
pub use report::{
    DataQualityWarning, EcmViewRow, PortfolioInsights, PortfolioReport, PortfolioSummary,
    RankedMeasure, WarningKind,
};
pub use router::portfolio_router;
pub use savings::SavingsBreakdown;
