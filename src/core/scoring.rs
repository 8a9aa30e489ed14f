use super::types::{
    FundabilityInput, FundabilityRating, HealthBreakdown, HealthGrade, HealthInputs,
    HealthScoreResult,
};

const FUNDABILITY_SURVIVAL_WEIGHT: f64 = 0.4;
const FUNDABILITY_RUNWAY_WEIGHT: f64 = 0.3;
const FUNDABILITY_BURN_WEIGHT: f64 = 0.2;
const FUNDABILITY_GROWTH_BONUS: f64 = 10.0;

const RUNWAY_RAMP_START_MONTHS: f64 = 3.0;
const RUNWAY_RAMP_END_MONTHS: f64 = 18.0;
const BURN_RAMP_BEST: f64 = 20_000.0;
const BURN_RAMP_WORST: f64 = 100_000.0;

const HEALTH_LIQUIDITY_WEIGHT: f64 = 0.4;
const HEALTH_SOLVENCY_WEIGHT: f64 = 0.2;
const HEALTH_GROWTH_WEIGHT: f64 = 0.2;
const HEALTH_STABILITY_WEIGHT: f64 = 0.2;

const HEALTH_TARGET_RUNWAY_MONTHS: f64 = 18.0;
const HEALTH_NET_WORTH_MONTHS: f64 = 24.0;
const HEALTH_DEFAULT_IDEAL_NET_WORTH: f64 = 50_000.0;
const HEALTH_TARGET_PORTFOLIO: f64 = 100_000.0;
const HEALTH_DEFAULT_RISK: f64 = 5.0;

/// Rounds to the nearest integer with halves going up, so `-2.5` becomes
/// `-2`. `f64::round` would move it away from zero instead.
pub(super) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Investor-attractiveness score in `[0, 100]`.
///
/// Weighted: survival 40%, runway 30% (ramp 3..18 months), burn 20% (ramp
/// 100k..20k), plus a flat 10 points of growth potential.
pub fn calculate_fundability(input: &FundabilityInput) -> u32 {
    let runway_score = ((input.runway_months - RUNWAY_RAMP_START_MONTHS)
        / (RUNWAY_RAMP_END_MONTHS - RUNWAY_RAMP_START_MONTHS))
        .clamp(0.0, 1.0)
        * 100.0;
    let burn_score = ((BURN_RAMP_WORST - input.monthly_burn) / (BURN_RAMP_WORST - BURN_RAMP_BEST))
        .clamp(0.0, 1.0)
        * 100.0;

    let score = input.survival_score * FUNDABILITY_SURVIVAL_WEIGHT
        + runway_score * FUNDABILITY_RUNWAY_WEIGHT
        + burn_score * FUNDABILITY_BURN_WEIGHT
        + FUNDABILITY_GROWTH_BONUS;

    round_half_up(score).clamp(0.0, 100.0) as u32
}

pub fn fundability_rating(score: u32) -> FundabilityRating {
    match score {
        80.. => FundabilityRating::VcReady,
        70..=79 => FundabilityRating::Fundable,
        60..=69 => FundabilityRating::Promising,
        40..=59 => FundabilityRating::Risky,
        _ => FundabilityRating::Unfundable,
    }
}

fn health_grade(total: i64) -> HealthGrade {
    match total {
        90.. => HealthGrade::APlus,
        80..=89 => HealthGrade::A,
        70..=79 => HealthGrade::B,
        60..=69 => HealthGrade::C,
        40..=59 => HealthGrade::D,
        _ => HealthGrade::F,
    }
}

// Zero and NaN count as "not provided", matching how the dashboard feeds
// these numbers in.
fn provided(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Dashboard-level composite of liquidity, solvency, growth and stability.
///
/// Missing inputs default to zero, except risk which defaults to 5. The
/// total is computed from the unrounded sub-metrics; only the reported
/// breakdown is rounded.
pub fn calculate_health_score(inputs: &HealthInputs) -> HealthScoreResult {
    let runway = provided(inputs.runway_months).unwrap_or(0.0);
    let net_worth = provided(inputs.net_worth).unwrap_or(0.0);
    let burn = provided(inputs.monthly_burn).unwrap_or(0.0);
    let portfolio = provided(inputs.portfolio_value).unwrap_or(0.0);
    let risk = provided(inputs.risk_score).unwrap_or(HEALTH_DEFAULT_RISK);

    let mut liquidity = (runway / HEALTH_TARGET_RUNWAY_MONTHS * 100.0).min(100.0);
    if runway == 0.0 && net_worth > 0.0 {
        // No tracked runway but some financial data: personal finance case.
        liquidity = 50.0;
    }

    let ideal_net_worth = if burn > 0.0 {
        burn * HEALTH_NET_WORTH_MONTHS
    } else {
        HEALTH_DEFAULT_IDEAL_NET_WORTH
    };
    let solvency = (net_worth / ideal_net_worth * 100.0).min(100.0);

    let growth = (portfolio / HEALTH_TARGET_PORTFOLIO * 100.0).min(100.0);

    let stability = 100.0 - risk * 10.0;

    let total_score = round_half_up(
        liquidity * HEALTH_LIQUIDITY_WEIGHT
            + solvency * HEALTH_SOLVENCY_WEIGHT
            + growth * HEALTH_GROWTH_WEIGHT
            + stability * HEALTH_STABILITY_WEIGHT,
    ) as i64;

    let grade = health_grade(total_score);

    HealthScoreResult {
        total_score,
        grade,
        metrics: HealthBreakdown {
            liquidity: round_half_up(liquidity) as i64,
            solvency: round_half_up(solvency) as i64,
            growth: round_half_up(growth) as i64,
            stability: round_half_up(stability) as i64,
        },
        summary: grade.summary().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn fundability(runway_months: f64, monthly_burn: f64, survival_score: f64) -> u32 {
        calculate_fundability(&FundabilityInput {
            runway_months,
            monthly_burn,
            survival_score,
        })
    }

    #[test]
    fn fundability_vc_ready_scenario() {
        let score = fundability(18.0, 20_000.0, 80.0);
        assert_eq!(score, 92);
        assert_eq!(fundability_rating(score).label(), "A+ (VC Ready)");
    }

    #[test]
    fn fundability_floors_at_growth_bonus_plus_survival() {
        // Runway and burn ramps both bottom out.
        assert_eq!(fundability(2.0, 150_000.0, 5.0), 12);
        assert_eq!(fundability(0.0, 1_000_000.0, 0.0), 10);
    }

    #[test]
    fn fundability_is_capped_at_one_hundred() {
        assert_eq!(fundability(999.0, 0.0, 95.0), 98);
        assert_eq!(fundability(999.0, 0.0, 500.0), 100);
    }

    #[test]
    fn fundability_mid_ramps() {
        // 50 * 0.4 + 50 * 0.3 + 50 * 0.2 + 10
        assert_eq!(fundability(10.5, 60_000.0, 50.0), 55);
    }

    #[test]
    fn fundability_rating_bands_include_lower_bound() {
        assert_eq!(fundability_rating(100), FundabilityRating::VcReady);
        assert_eq!(fundability_rating(80), FundabilityRating::VcReady);
        assert_eq!(fundability_rating(79), FundabilityRating::Fundable);
        assert_eq!(fundability_rating(70), FundabilityRating::Fundable);
        assert_eq!(fundability_rating(60), FundabilityRating::Promising);
        assert_eq!(fundability_rating(59), FundabilityRating::Risky);
        assert_eq!(fundability_rating(40), FundabilityRating::Risky);
        assert_eq!(fundability_rating(39), FundabilityRating::Unfundable);
        assert_eq!(fundability_rating(0), FundabilityRating::Unfundable);
    }

    #[test]
    fn fundability_rating_serializes_as_label() {
        let json = serde_json::to_string(&FundabilityRating::Promising).expect("serialize");
        assert_eq!(json, "\"B (Promising)\"");
    }

    #[test]
    fn health_score_defaults() {
        let result = calculate_health_score(&HealthInputs::default());
        // liquidity 0, solvency 0, growth 0, stability 50
        assert_eq!(result.total_score, 10);
        assert_eq!(result.grade, HealthGrade::F);
        assert_eq!(result.summary, "Critical Action Needed");
        assert_eq!(
            result.metrics,
            HealthBreakdown {
                liquidity: 0,
                solvency: 0,
                growth: 0,
                stability: 50,
            }
        );
    }

    #[test]
    fn health_score_dashboard_demo_defaults() {
        let result = calculate_health_score(&HealthInputs {
            net_worth: Some(125_000.0),
            monthly_burn: Some(4_000.0),
            runway_months: Some(18.0),
            portfolio_value: Some(75_000.0),
            risk_score: Some(4.0),
        });
        // 100 * 0.4 + 100 * 0.2 + 75 * 0.2 + 60 * 0.2 = 87
        assert_eq!(result.total_score, 87);
        assert_eq!(result.grade, HealthGrade::A);
        assert_eq!(result.summary, "Strong Position");
        assert_eq!(result.metrics.solvency, 100);
        assert_eq!(result.metrics.growth, 75);
        assert_eq!(result.metrics.stability, 60);
    }

    #[test]
    fn health_liquidity_falls_back_when_runway_missing() {
        let result = calculate_health_score(&HealthInputs {
            net_worth: Some(10_000.0),
            ..HealthInputs::default()
        });
        assert_eq!(result.metrics.liquidity, 50);
        // solvency 10000 / 50000
        assert_eq!(result.metrics.solvency, 20);
    }

    #[test]
    fn health_zero_risk_is_treated_as_missing() {
        let result = calculate_health_score(&HealthInputs {
            risk_score: Some(0.0),
            ..HealthInputs::default()
        });
        assert_eq!(result.metrics.stability, 50);
    }

    #[test]
    fn health_total_uses_unrounded_submetrics() {
        // liquidity 11.4: 11.4 * 0.4 + 10 = 14.56 -> 15, while the rounded
        // display value would give 11 * 0.4 + 10 = 14.4 -> 14.
        let result = calculate_health_score(&HealthInputs {
            runway_months: Some(2.052),
            risk_score: Some(5.0),
            ..HealthInputs::default()
        });
        assert_eq!(result.metrics.liquidity, 11);
        assert_eq!(result.total_score, 15);
    }

    #[test]
    fn health_negative_halves_round_up() {
        // solvency -1250 / 50000 * 100 = -2.5, stability 100 - 102.5 = -2.5
        let result = calculate_health_score(&HealthInputs {
            net_worth: Some(-1_250.0),
            risk_score: Some(10.25),
            ..HealthInputs::default()
        });
        assert_eq!(result.metrics.solvency, -2);
        assert_eq!(result.metrics.stability, -2);
        // -0.5 - 0.5 = -1
        assert_eq!(result.total_score, -1);
    }

    #[test]
    fn round_half_up_matches_positive_round() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.49), 0.0);
    }

    #[test]
    fn health_grade_bands() {
        assert_eq!(health_grade(95), HealthGrade::APlus);
        assert_eq!(health_grade(90), HealthGrade::APlus);
        assert_eq!(health_grade(80), HealthGrade::A);
        assert_eq!(health_grade(70), HealthGrade::B);
        assert_eq!(health_grade(60), HealthGrade::C);
        assert_eq!(health_grade(40), HealthGrade::D);
        assert_eq!(health_grade(39), HealthGrade::F);
        assert_eq!(health_grade(-5), HealthGrade::F);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_fundability_monotonic_in_survival(
            runway in 0u32..40,
            burn in 0u32..200_000,
            low in 0u32..96,
            extra in 0u32..50
        ) {
            let a = fundability(f64::from(runway), f64::from(burn), f64::from(low));
            let b = fundability(f64::from(runway), f64::from(burn), f64::from(low + extra));
            prop_assert!(a <= b);
        }

        #[test]
        fn prop_fundability_monotonic_in_runway(
            survival in 5u32..96,
            burn in 0u32..200_000,
            low in 0u32..19,
            extra in 0u32..19
        ) {
            let high = (low + extra).min(18);
            let a = fundability(f64::from(low), f64::from(burn), f64::from(survival));
            let b = fundability(f64::from(high), f64::from(burn), f64::from(survival));
            prop_assert!(a <= b);
        }

        #[test]
        fn prop_fundability_non_increasing_in_burn(
            survival in 5u32..96,
            runway in 0u32..40,
            low in 0u32..100_001,
            extra in 0u32..100_001
        ) {
            let high = (low + extra).min(100_000);
            let a = fundability(f64::from(runway), f64::from(low), f64::from(survival));
            let b = fundability(f64::from(runway), f64::from(high), f64::from(survival));
            prop_assert!(a >= b);
        }
    }
}
