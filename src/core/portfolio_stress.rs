use super::types::{AllocationEntry, PortfolioStressResult};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Exposure {
    stocks: f64,
    crypto: f64,
    bonds: f64,
}

#[derive(Debug, Clone, Copy)]
struct MarketShock {
    name: &'static str,
    description: &'static str,
    stocks: f64,
    crypto: f64,
    bonds: f64,
}

impl MarketShock {
    fn change(&self, exposure: Exposure) -> f64 {
        exposure.stocks * self.stocks + exposure.crypto * self.crypto + exposure.bonds * self.bonds
    }
}

const SHOCKS: [MarketShock; 3] = [
    MarketShock {
        name: "Global Recession",
        description: "Severe economic downturn",
        stocks: -0.30,
        crypto: -0.50,
        bonds: 0.05,
    },
    MarketShock {
        name: "High Inflation",
        description: "Purchasing power decline",
        stocks: -0.10,
        crypto: 0.10,
        bonds: -0.05,
    },
    MarketShock {
        name: "Tech Bull Run",
        description: "Aggressive growth cycle",
        stocks: 0.25,
        crypto: 0.40,
        bonds: -0.02,
    },
];

// Asset types outside these buckets (commodities, cash) are unexposed.
fn exposure(allocation: &[AllocationEntry]) -> Exposure {
    allocation
        .iter()
        .fold(Exposure::default(), |mut acc, asset| {
            let share = asset.percentage / 100.0;
            match asset.asset_type.as_str() {
                "Crypto" => acc.crypto += share,
                "Stock" | "ETF" => acc.stocks += share,
                "Bond" => acc.bonds += share,
                _ => {}
            }
            acc
        })
}

/// Applies the three fixed market shocks to an allocation.
pub fn run_stress_tests(
    current_value: f64,
    allocation: &[AllocationEntry],
) -> Vec<PortfolioStressResult> {
    let exposure = exposure(allocation);
    SHOCKS
        .iter()
        .map(|shock| {
            let change = shock.change(exposure);
            PortfolioStressResult {
                scenario: shock.name,
                change_percent: change,
                projected_value: current_value * (1.0 + change),
                description: shock.description,
            }
        })
        .collect()
}
