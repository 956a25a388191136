use super::rows::EcmViewRow;
use super::summary::PortfolioSummary;
use super::views::{PortfolioInsights, RankedMeasure};
use std::cmp::Ordering;

/// Paybacks at or under this many years count as quick wins.
pub const QUICK_WIN_PAYBACK_YEARS: f64 = 3.0;

pub(crate) fn generate_insights(
    rows: &[EcmViewRow],
    summary: &PortfolioSummary,
) -> PortfolioInsights {
    let rank = |row: &EcmViewRow| RankedMeasure {
        id: row.id,
        ecm_name: row.ecm_name.clone(),
        simple_payback: row.simple_payback,
        annual_cost_savings: row.annual_cost_savings,
        savings_share: if summary.total_annual_savings > 0.0 {
            row.annual_cost_savings / summary.total_annual_savings
        } else {
            0.0
        },
    };

    // Meaningful paybacks ascending; the rest keep input order at the tail.
    let mut ordered: Vec<&EcmViewRow> = rows.iter().collect();
    ordered.sort_by(|left, right| {
        match (
            left.simple_payback.meaningful_years(),
            right.simple_payback.meaningful_years(),
        ) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    let payback_ranking: Vec<RankedMeasure> = ordered.into_iter().map(rank).collect();

    let meaningful_payback_count = rows
        .iter()
        .filter(|row| row.simple_payback.is_meaningful())
        .count();
    let quickest_payback = payback_ranking
        .first()
        .filter(|measure| measure.simple_payback.is_meaningful())
        .cloned();

    let largest_savings = rows
        .iter()
        .filter(|row| row.annual_cost_savings > 0.0)
        .fold(None::<&EcmViewRow>, |best, row| match best {
            Some(best) if best.annual_cost_savings >= row.annual_cost_savings => Some(best),
            _ => Some(row),
        })
        .map(rank);

    let quick_wins: Vec<RankedMeasure> = payback_ranking
        .iter()
        .filter(|measure| {
            measure
                .simple_payback
                .meaningful_years()
                .is_some_and(|years| years <= QUICK_WIN_PAYBACK_YEARS)
        })
        .cloned()
        .collect();

    let pays_back_within_lifetime = rows
        .iter()
        .filter(|row| row.pays_back_within_lifetime())
        .count();

    let mut observations = Vec::new();
    if rows.is_empty() {
        observations.push("No energy conservation measures were extracted".to_string());
    } else {
        observations.push(format!(
            "{} of {} measure(s) have a meaningful simple payback",
            meaningful_payback_count,
            rows.len()
        ));
    }

    if let Some(measure) = &largest_savings {
        observations.push(format!(
            "{} contributes {:.0}% of annual cost savings",
            measure.ecm_name,
            measure.savings_share * 100.0
        ));
    }

    if !quick_wins.is_empty() {
        observations.push(format!(
            "{} quick win(s) pay back within {} years",
            quick_wins.len(),
            QUICK_WIN_PAYBACK_YEARS
        ));
    }

    let lifetimes_known = rows
        .iter()
        .filter(|row| row.ecm_lifetime_years.is_some())
        .count();
    if lifetimes_known > 0 {
        observations.push(format!(
            "{pays_back_within_lifetime} of {lifetimes_known} measure(s) with a known lifetime pay back before end of life"
        ));
    }

    let not_applicable = rows.len() - meaningful_payback_count;
    if not_applicable > 0 {
        observations.push(format!(
            "{not_applicable} measure(s) show no positive net payback and are excluded from the average"
        ));
    }

    if let (Some(average), Some(weighted)) = (
        summary.average_payback.meaningful_years(),
        summary.portfolio_payback.meaningful_years(),
    ) {
        if (average - weighted).abs() > 1.0 {
            observations.push(format!(
                "Average payback of {average:.1} years differs from the cost-weighted {weighted:.1} years"
            ));
        }
    }

    PortfolioInsights {
        measure_count: rows.len(),
        meaningful_payback_count,
        pays_back_within_lifetime,
        quickest_payback,
        largest_savings,
        payback_ranking,
        quick_wins,
        observations,
    }
}
