mod engine;
mod portfolio_stress;
mod scenario;
mod scoring;
mod types;

pub use engine::{
    apply_founder_controls, calculate_stress_test, calculate_survival_score, run_pipeline,
    runway_months,
};
pub use portfolio_stress::run_stress_tests;
pub use scenario::run_scenario_simulation;
pub use scoring::{calculate_fundability, calculate_health_score, fundability_rating};
pub use types::{
    AdjustedFinancialData, AllocationEntry, FinancialSnapshot, FounderControls, FundabilityInput,
    FundabilityRating, HealthBreakdown, HealthGrade, HealthInputs, HealthScoreResult,
    INFINITE_RUNWAY, PipelineResult, PortfolioStressResult, RiskProfile, ScenarioProjection,
    ScenarioResult, ScenarioType, StressTestControls,
};
