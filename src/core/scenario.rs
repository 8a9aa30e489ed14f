use super::scoring::round_half_up;
use super::types::{RiskProfile, ScenarioProjection, ScenarioResult, ScenarioType};

const PROJECTION_YEARS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GrowthAssumptions {
    base_growth: f64,
    volatility: f64,
}

fn growth_assumptions(kind: ScenarioType, risk: RiskProfile) -> GrowthAssumptions {
    let (base_growth, volatility) = match (kind, risk) {
        (ScenarioType::Invest, RiskProfile::Low) => (0.04, 0.05),
        (ScenarioType::Invest, RiskProfile::Medium) => (0.08, 0.12),
        (ScenarioType::Invest, RiskProfile::High) => (0.12, 0.20),
        // A "low risk" startup is modelled as stagnation.
        (ScenarioType::Startup, RiskProfile::Low) => (0.0, 0.10),
        (ScenarioType::Startup, RiskProfile::Medium) => (0.40, 0.50),
        (ScenarioType::Startup, RiskProfile::High) => (0.80, 0.90),
        (ScenarioType::Hybrid, _) => (0.15, 0.25),
    };
    GrowthAssumptions {
        base_growth,
        volatility,
    }
}

fn scenario_risk_score(kind: ScenarioType, risk: RiskProfile) -> u32 {
    match (kind, risk) {
        (ScenarioType::Startup, _) => 9,
        (ScenarioType::Hybrid, _) => 6,
        (ScenarioType::Invest, RiskProfile::Low) => 2,
        (ScenarioType::Invest, RiskProfile::Medium) => 5,
        (ScenarioType::Invest, RiskProfile::High) => 7,
    }
}

/// Five-year compounding projection with optimistic and pessimistic bands.
///
/// Each year adds twelve monthly contributions to all three running totals,
/// then grows them by `g`, `g + vol/2` and `g - vol`. Startup pessimistic
/// totals never drop below zero.
pub fn run_scenario_simulation(
    kind: ScenarioType,
    capital: f64,
    monthly_contribution: f64,
    risk: RiskProfile,
) -> ScenarioResult {
    let GrowthAssumptions {
        base_growth,
        volatility,
    } = growth_assumptions(kind, risk);
    let yearly_contribution = monthly_contribution * 12.0;

    let mut central = capital;
    let mut optimistic = capital;
    let mut pessimistic = capital;
    let mut projections = Vec::with_capacity(PROJECTION_YEARS as usize);

    for year in 1..=PROJECTION_YEARS {
        central += yearly_contribution;
        optimistic += yearly_contribution;
        pessimistic += yearly_contribution;

        central *= 1.0 + base_growth;
        optimistic *= 1.0 + base_growth + volatility * 0.5;
        pessimistic *= 1.0 + base_growth - volatility;

        if kind == ScenarioType::Startup && pessimistic < 0.0 {
            pessimistic = 0.0;
        }

        projections.push(ScenarioProjection {
            year,
            value: round_half_up(central),
            upper_bound: round_half_up(optimistic),
            lower_bound: round_half_up(pessimistic),
        });
    }

    ScenarioResult {
        net_worth_5_year: round_half_up(central),
        best_case: round_half_up(optimistic),
        worst_case: round_half_up(pessimistic),
        risk_score: scenario_risk_score(kind, risk),
        projections,
    }
}
