//! Supplier watchlist and its risk distribution.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WatchedSupplier {
    pub name: &'static str,
    pub region: &'static str,
    pub annual_spend_eur: f64,
    pub news: &'static str,
    pub risk_score: u32,
}

impl WatchedSupplier {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Scores strictly above 60 are High and strictly above 40 Medium.
    pub fn from_score(score: u32) -> Self {
        if score > 60 {
            RiskLevel::High
        } else if score > 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelCount {
    pub level: RiskLevel,
    pub count: usize,
}

pub fn supplier_watchlist() -> Vec<WatchedSupplier> {
    vec![
        WatchedSupplier {
            name: "Global Components Ltd",
            region: "Asia-Pacific",
            annual_spend_eur: 45_000_000.0,
            news: "Recent port congestion in Shanghai affecting shipments. Company announced new facility in Vietnam.",
            risk_score: 72,
        },
        WatchedSupplier {
            name: "EuroTech Industries",
            region: "Europe",
            annual_spend_eur: 38_000_000.0,
            news: "Stable operations. Won sustainability award. Minor labor negotiations ongoing.",
            risk_score: 35,
        },
        WatchedSupplier {
            name: "AmeriParts Inc",
            region: "Americas",
            annual_spend_eur: 32_000_000.0,
            news: "Strong Q4 results. Expanding capacity in Mexico. No supply disruptions reported.",
            risk_score: 22,
        },
        WatchedSupplier {
            name: "Pacific Manufacturing",
            region: "Asia-Pacific",
            annual_spend_eur: 28_000_000.0,
            news: "Facing raw material cost increases. Key executive departure announced.",
            risk_score: 68,
        },
        WatchedSupplier {
            name: "Nordic Precision AB",
            region: "Europe",
            annual_spend_eur: 25_000_000.0,
            news: "Energy cost concerns in winter months. Otherwise stable operations.",
            risk_score: 41,
        },
    ]
}

/// Count suppliers per level, always High, Medium, Low.
pub fn risk_distribution(suppliers: &[WatchedSupplier]) -> Vec<RiskLevelCount> {
    [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]
        .into_iter()
        .map(|level| RiskLevelCount {
            level,
            count: suppliers.iter().filter(|s| s.risk_level() == level).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watchlist_distribution() {
        let counts: Vec<usize> = risk_distribution(&supplier_watchlist())
            .iter()
            .map(|c| c.count)
            .collect();
        assert_eq!(counts, [2, 1, 2]);
    }

    #[test]
    fn thresholds() {
        assert_eq!(RiskLevel::from_score(61), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Low);
        assert!(risk_distribution(&[]).iter().all(|c| c.count == 0));
    }
}
