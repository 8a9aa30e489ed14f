use super::scoring::{calculate_fundability, fundability_rating};
use super::types::{
    AdjustedFinancialData, FinancialSnapshot, FounderControls, FundabilityInput, INFINITE_RUNWAY,
    PipelineResult, SURVIVAL_SCORE_MAX, SURVIVAL_SCORE_MIN, StressTestControls,
};

const SURVIVAL_BASE_SCORE: i32 = 70;

// Deliberate hires in the founder plan and reactive headcount in a stress
// test are priced separately.
const FOUNDER_HIRE_MONTHLY_COST: f64 = 9_000.0;
const STRESS_HIRE_MONTHLY_COST: f64 = 8_000.0;

const MARKETING_SPEND_PER_GROWTH_POINT: f64 = 20_000.0;
const MARKETING_GROWTH_CAP: f64 = 5.0;

const RECESSION_BURN_MULTIPLIER: f64 = 1.15;

impl FinancialSnapshot {
    /// Builds a snapshot whose runway and survival score agree with the
    /// supplied metrics.
    pub fn from_metrics(revenue: f64, burn: f64, growth: f64, team: u32, cash: f64) -> Self {
        let runway = runway_months(cash, burn);
        Self {
            revenue,
            burn,
            growth,
            team,
            cash,
            runway,
            survival_score: calculate_survival_score(runway, growth, burn, revenue),
        }
    }
}

/// Whole months of cash left at the given burn.
pub fn runway_months(cash: f64, burn: f64) -> u32 {
    if burn > 0.0 {
        // Float-to-int casts saturate, so negative cash lands on zero.
        (cash / burn).floor() as u32
    } else {
        INFINITE_RUNWAY
    }
}

/// Heuristic viability score in `[5, 95]`.
///
/// Starts at 70 and applies independent adjustments; every threshold is a
/// strict inequality, so 12 and 18 months trigger neither runway rule.
pub fn calculate_survival_score(
    runway_months: u32,
    growth_percent: f64,
    burn: f64,
    revenue: f64,
) -> u32 {
    let mut score = SURVIVAL_BASE_SCORE;

    if runway_months < 12 {
        score -= 20;
    }
    if runway_months > 18 {
        score += 10;
    }
    if growth_percent > 10.0 {
        score += 10;
    }
    if burn > revenue {
        score -= 10;
    }

    clamp_survival(score)
}

fn clamp_survival(score: i32) -> u32 {
    score.clamp(SURVIVAL_SCORE_MIN, SURVIVAL_SCORE_MAX) as u32
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Applies founder overrides to a baseline and returns a new snapshot.
///
/// Revenue is never touched by founder controls; runway and survival score
/// are recomputed from scratch against the new figures.
pub fn apply_founder_controls(
    base: &FinancialSnapshot,
    controls: &FounderControls,
) -> FinancialSnapshot {
    let cash = match controls.starting_capital_override {
        Some(capital) if capital >= 0.0 => capital,
        _ => base.cash,
    };

    let burn = base.burn
        + f64::from(controls.planned_hires) * FOUNDER_HIRE_MONTHLY_COST
        + controls.monthly_marketing_budget;

    let marketing_boost = (controls.monthly_marketing_budget / MARKETING_SPEND_PER_GROWTH_POINT)
        .min(MARKETING_GROWTH_CAP);
    let growth = base.growth + marketing_boost;

    let team = base.team + controls.planned_hires;

    // Scored on the exact growth; only the reported figure is rounded.
    let runway = runway_months(cash, burn);
    FinancialSnapshot {
        revenue: base.revenue,
        burn,
        growth: round_to_tenth(growth),
        team,
        cash,
        runway,
        survival_score: calculate_survival_score(runway, growth, burn, base.revenue),
    }
}

/// Applies macro shocks on top of a snapshot.
///
/// Burn is shocked multiplicatively (recession, ad costs) before the
/// additive headcount cost, then rounded. Cash is left alone. The survival
/// score is walked down from the score the snapshot already carries rather
/// than recomputed, so founder-driven changes stack with the penalties.
pub fn calculate_stress_test(
    base: &FinancialSnapshot,
    controls: &StressTestControls,
) -> AdjustedFinancialData {
    let mut adjusted_burn = base.burn;
    if controls.recession {
        adjusted_burn *= RECESSION_BURN_MULTIPLIER;
    }
    adjusted_burn *= 1.0 + controls.ad_cost_increase_percent / 100.0;
    adjusted_burn += f64::from(controls.hiring_expansion) * STRESS_HIRE_MONTHLY_COST;
    let adjusted_burn = adjusted_burn.round();

    let adjusted_growth = (base.growth - controls.growth_slowdown_percent).max(0.0);

    let adjusted_runway = runway_months(base.cash, adjusted_burn);

    let mut score = base.survival_score as i32;
    if controls.recession {
        score -= 15;
    }
    if adjusted_runway < 10 {
        score -= 15;
    }
    if adjusted_growth < 5.0 {
        score -= 10;
    }
    if adjusted_burn > base.revenue * 2.0 {
        score -= 10;
    }

    AdjustedFinancialData {
        adjusted_burn,
        adjusted_growth,
        adjusted_runway,
        adjusted_survival_score: clamp_survival(score),
    }
}

/// Founder controls first, then macro stress, then a fundability read of
/// the stressed figures.
pub fn run_pipeline(
    base: &FinancialSnapshot,
    founder: &FounderControls,
    stress: &StressTestControls,
) -> PipelineResult {
    let founder_adjusted = apply_founder_controls(base, founder);
    let stressed = calculate_stress_test(&founder_adjusted, stress);
    let fundability = calculate_fundability(&FundabilityInput {
        runway_months: f64::from(stressed.adjusted_runway),
        monthly_burn: stressed.adjusted_burn,
        survival_score: f64::from(stressed.adjusted_survival_score),
    });

    PipelineResult {
        baseline: *base,
        founder_adjusted,
        stressed,
        fundability,
        rating: fundability_rating(fundability),
        is_stressed: stress.is_active(),
        is_founder_modified: founder.is_active(),
    }
}
