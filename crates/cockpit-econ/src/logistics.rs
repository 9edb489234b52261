//! 3PL provider spend, regional split and consolidation model.

use crate::cash::total_contract_value;
use chrono::{Days, NaiveDate};
use cockpit_core::numeric::{finite_or_zero, mean};
use cockpit_core::Provider;
use serde::{Deserialize, Serialize};

/// Turnover improvement credited per provider removed, in percentage points.
pub const TURNOVER_GAIN_PER_PROVIDER: f64 = 0.8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSpend {
    pub region: String,
    pub value: f64,
    /// Share of total spend in percent; zero when total spend is zero.
    pub percentage: f64,
}

/// Outcome of keeping only the best-performing providers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consolidation {
    pub current_count: usize,
    pub target_count: usize,
    pub consolidated_spend: f64,
    pub projected_savings: f64,
    pub new_avg_performance: f64,
    pub turnover_improvement: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticsSummary {
    pub total_spend: f64,
    pub avg_performance: f64,
    pub total_plants_served: u64,
    pub budget: f64,
    /// Spend relative to budget in percent (negative = under budget).
    pub budget_variance_pct: f64,
    pub region_spend: Vec<RegionSpend>,
    pub consolidation: Consolidation,
}

/// Spend per region in first-seen order.
pub fn region_spend(providers: &[Provider]) -> Vec<RegionSpend> {
    let total = total_contract_value(providers);
    let mut out: Vec<RegionSpend> = Vec::new();
    for p in providers {
        let value = finite_or_zero(p.contract_value_eur);
        match out.iter_mut().find(|r| r.region == p.region) {
            Some(r) => r.value += value,
            None => out.push(RegionSpend {
                region: p.region.clone(),
                value,
                percentage: 0.0,
            }),
        }
    }
    if total > 0.0 {
        for r in &mut out {
            r.percentage = r.value / total * 100.0;
        }
    }
    out
}

/// Keep the `target` best-scoring providers (ties keep input order).
pub fn consolidate(providers: &[Provider], target: usize) -> Consolidation {
    let mut ranked: Vec<&Provider> = providers.iter().collect();
    ranked.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));
    ranked.truncate(target);

    let consolidated_spend: f64 = ranked
        .iter()
        .map(|p| finite_or_zero(p.contract_value_eur))
        .sum();
    let scores: Vec<f64> = ranked.iter().map(|p| p.performance_score).collect();
    let removed = providers.len().saturating_sub(target);
    Consolidation {
        current_count: providers.len(),
        target_count: target,
        consolidated_spend,
        projected_savings: total_contract_value(providers) - consolidated_spend,
        new_avg_performance: finite_or_zero(mean(&scores)),
        turnover_improvement: removed as f64 * TURNOVER_GAIN_PER_PROVIDER,
    }
}

pub fn logistics_summary(providers: &[Provider], budget: f64, target: usize) -> LogisticsSummary {
    let total_spend = total_contract_value(providers);
    let scores: Vec<f64> = providers.iter().map(|p| p.performance_score).collect();
    let budget_variance_pct = if budget > 0.0 {
        (total_spend / budget - 1.0) * 100.0
    } else {
        0.0
    };
    LogisticsSummary {
        total_spend,
        avg_performance: finite_or_zero(mean(&scores)),
        total_plants_served: providers.iter().map(|p| u64::from(p.plants_served)).sum(),
        budget,
        budget_variance_pct,
        region_spend: region_spend(providers),
        consolidation: consolidate(providers, target),
    }
}

/// Providers whose contract ends within `horizon_days` of `as_of`
/// (inclusive), soonest first. Already-expired contracts are included;
/// unparsable expiry dates are skipped.
pub fn expiring_contracts(
    providers: &[Provider],
    as_of: NaiveDate,
    horizon_days: u64,
) -> Vec<&Provider> {
    let Some(limit) = as_of.checked_add_days(Days::new(horizon_days)) else {
        return Vec::new();
    };
    let mut out: Vec<(NaiveDate, &Provider)> = providers
        .iter()
        .filter_map(|p| p.contract_expiry_date().map(|d| (d, p)))
        .filter(|(d, _)| *d <= limit)
        .collect();
    out.sort_by_key(|(d, _)| *d);
    out.into_iter().map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str, region: &str, value: f64, score: f64, expiry: &str) -> Provider {
        Provider {
            provider_id: id.to_string(),
            provider_name: format!("Carrier {id}"),
            region: region.to_string(),
            contract_value_eur: value,
            performance_score: score,
            plants_served: 3,
            contract_expiry: expiry.to_string(),
            ..Provider::default()
        }
    }

    fn fleet() -> Vec<Provider> {
        vec![
            provider("A", "Europe", 40.0, 90.0, "2025-03-31"),
            provider("B", "Americas", 30.0, 95.0, "2025-12-31"),
            provider("C", "Europe", 20.0, 80.0, "2025-01-15"),
            provider("D", "MEA", 10.0, 85.0, "n/a"),
        ]
    }

    #[test]
    fn summary_totals() {
        let s = logistics_summary(&fleet(), 200.0, 2);
        assert_eq!(s.total_spend, 100.0);
        assert_eq!(s.avg_performance, 87.5);
        assert_eq!(s.total_plants_served, 12);
        assert_eq!(s.budget_variance_pct, -50.0);
        let regions: Vec<_> = s.region_spend.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Europe", "Americas", "MEA"]);
        assert_eq!(s.region_spend[0].value, 60.0);
        assert_eq!(s.region_spend[0].percentage, 60.0);
    }

    #[test]
    fn consolidation_keeps_top_performers() {
        let c = consolidate(&fleet(), 2);
        assert_eq!(c.consolidated_spend, 70.0);
        assert_eq!(c.projected_savings, 30.0);
        assert_eq!(c.new_avg_performance, 92.5);
        assert!((c.turnover_improvement - 1.6).abs() < 1e-9);
    }

    #[test]
    fn consolidation_target_above_fleet() {
        let c = consolidate(&fleet(), 10);
        assert_eq!(c.projected_savings, 0.0);
        assert_eq!(c.turnover_improvement, 0.0);
        assert_eq!(c.target_count, 10);
    }

    #[test]
    fn empty_fleet() {
        let s = logistics_summary(&[], 0.0, 5);
        assert_eq!(s.avg_performance, 0.0);
        assert_eq!(s.budget_variance_pct, 0.0);
        assert!(s.region_spend.is_empty());
        assert_eq!(s.consolidation.new_avg_performance, 0.0);
    }

    #[test]
    fn expiring_within_horizon() {
        let fleet = fleet();
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let ids: Vec<_> = expiring_contracts(&fleet, as_of, 90)
            .iter()
            .map(|p| p.provider_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "A"]);
    }
}
