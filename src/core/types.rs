use serde::{Deserialize, Serialize};

/// Runway reported when burn is zero or negative.
pub const INFINITE_RUNWAY: u32 = 999;

pub const SURVIVAL_SCORE_MIN: i32 = 5;
pub const SURVIVAL_SCORE_MAX: i32 = 95;

/// Monthly financial picture of a simulated startup.
///
/// `runway` and `survival_score` are derived from the other fields at the
/// moment the snapshot is produced. Every engine stage returns a fresh
/// snapshot rather than editing one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub revenue: f64,
    pub burn: f64,
    pub growth: f64,
    pub team: u32,
    pub cash: f64,
    pub runway: u32,
    pub survival_score: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StressTestControls {
    pub recession: bool,
    #[serde(alias = "adCostIncrease")]
    pub ad_cost_increase_percent: f64,
    #[serde(alias = "hiringIncrease")]
    pub hiring_expansion: u32,
    #[serde(alias = "growthSlowdown")]
    pub growth_slowdown_percent: f64,
}

impl StressTestControls {
    pub fn is_active(&self) -> bool {
        self.recession
            || self.ad_cost_increase_percent > 0.0
            || self.hiring_expansion > 0
            || self.growth_slowdown_percent > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FounderControls {
    /// `None` keeps the baseline cash.
    #[serde(alias = "startingCapital")]
    pub starting_capital_override: Option<f64>,
    pub planned_hires: u32,
    #[serde(alias = "marketingBudget")]
    pub monthly_marketing_budget: f64,
}

impl FounderControls {
    pub fn is_active(&self) -> bool {
        self.starting_capital_override.is_some()
            || self.planned_hires > 0
            || self.monthly_marketing_budget > 0.0
    }
}

/// Result of the stress stage. Revenue, team and cash are unchanged by
/// stress, so callers keep the snapshot that went in for those.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedFinancialData {
    pub adjusted_burn: f64,
    pub adjusted_growth: f64,
    pub adjusted_runway: u32,
    pub adjusted_survival_score: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundabilityInput {
    pub runway_months: f64,
    pub monthly_burn: f64,
    pub survival_score: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FundabilityRating {
    #[serde(rename = "A+ (VC Ready)")]
    VcReady,
    #[serde(rename = "A (Fundable)")]
    Fundable,
    #[serde(rename = "B (Promising)")]
    Promising,
    #[serde(rename = "C (Risky)")]
    Risky,
    #[serde(rename = "D (Unfundable)")]
    Unfundable,
}

impl FundabilityRating {
    pub fn label(self) -> &'static str {
        match self {
            FundabilityRating::VcReady => "A+ (VC Ready)",
            FundabilityRating::Fundable => "A (Fundable)",
            FundabilityRating::Promising => "B (Promising)",
            FundabilityRating::Risky => "C (Risky)",
            FundabilityRating::Unfundable => "D (Unfundable)",
        }
    }
}

/// Dashboard inputs. Every field is optional; see `calculate_health_score`
/// for the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthInputs {
    pub net_worth: Option<f64>,
    pub monthly_burn: Option<f64>,
    pub runway_months: Option<f64>,
    pub portfolio_value: Option<f64>,
    pub risk_score: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum HealthGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl HealthGrade {
    pub fn summary(self) -> &'static str {
        match self {
            HealthGrade::APlus => "Excellent Financial Health",
            HealthGrade::A => "Strong Position",
            HealthGrade::B => "Healthy but optimize",
            HealthGrade::C => "Stable but vulnerable",
            HealthGrade::D => "High Risk Detected",
            HealthGrade::F => "Critical Action Needed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthBreakdown {
    pub liquidity: i64,
    pub solvency: i64,
    pub growth: i64,
    pub stability: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub total_score: i64,
    pub grade: HealthGrade,
    pub metrics: HealthBreakdown,
    pub summary: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Startup,
    Invest,
    Hybrid,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub year: u32,
    pub value: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub net_worth_5_year: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub risk_score: u32,
    pub projections: Vec<ScenarioProjection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub percentage: f64,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStressResult {
    pub scenario: &'static str,
    /// Fractional change, e.g. `-0.3` for a 30% drop.
    pub change_percent: f64,
    pub projected_value: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub baseline: FinancialSnapshot,
    pub founder_adjusted: FinancialSnapshot,
    pub stressed: AdjustedFinancialData,
    pub fundability: u32,
    pub rating: FundabilityRating,
    pub is_stressed: bool,
    pub is_founder_modified: bool,
}
