use serde::{Deserialize, Serialize};

use crate::advisor::{AgentAnalysis, fallback_snapshot};
use crate::core::{
    AdjustedFinancialData, AllocationEntry, FinancialSnapshot, FounderControls, FundabilityRating,
    PortfolioStressResult, RiskProfile, ScenarioType, StressTestControls,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct GeneratePayload {
    pub idea: Option<String>,
}

/// Snapshot fields as sent by clients. Missing metrics take the fallback
/// baseline's values; runway and survival score are derived unless given,
/// so a caller can carry a founder-adjusted score into the stress stage.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SnapshotPayload {
    pub revenue: Option<f64>,
    pub burn: Option<f64>,
    pub growth: Option<f64>,
    pub team: Option<u32>,
    pub cash: Option<f64>,
    pub runway: Option<u32>,
    pub survival_score: Option<u32>,
}

impl SnapshotPayload {
    pub fn into_snapshot(self) -> FinancialSnapshot {
        let fallback = fallback_snapshot();
        let derived = FinancialSnapshot::from_metrics(
            self.revenue.unwrap_or(fallback.revenue),
            self.burn.unwrap_or(fallback.burn),
            self.growth.unwrap_or(fallback.growth),
            self.team.unwrap_or(fallback.team),
            self.cash.unwrap_or(fallback.cash),
        );
        FinancialSnapshot {
            runway: self.runway.unwrap_or(derived.runway),
            survival_score: self.survival_score.unwrap_or(derived.survival_score),
            ..derived
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SimulatePayload {
    pub baseline: SnapshotPayload,
    pub founder: FounderControls,
    pub stress: StressTestControls,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SurvivalPayload {
    #[serde(alias = "runway")]
    pub runway_months: u32,
    #[serde(alias = "growth")]
    pub growth_percent: f64,
    pub burn: f64,
    pub revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SurvivalResponse {
    pub survival_score: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct FounderPayload {
    pub baseline: SnapshotPayload,
    pub controls: FounderControls,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct StressPayload {
    pub baseline: SnapshotPayload,
    pub controls: StressTestControls,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StressResponse {
    #[serde(flatten)]
    pub adjusted: AdjustedFinancialData,
    pub is_stressed: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct FundabilityResponse {
    pub score: u32,
    pub rating: FundabilityRating,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScenarioPayload {
    #[serde(rename = "type")]
    pub kind: ScenarioType,
    pub capital: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    pub risk_profile: RiskProfile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct PortfolioStressPayload {
    pub current_value: f64,
    pub allocation: Vec<AllocationEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct PortfolioStressResponse {
    pub results: Vec<PortfolioStressResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct AgentsPayload {
    pub scenario: Option<serde_json::Value>,
}

impl AgentsPayload {
    /// The scenario as prompt text; objects are passed on as JSON.
    pub fn scenario_text(&self) -> Option<String> {
        match self.scenario.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) if text.trim().is_empty() => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AgentsResponse {
    pub analyses: Vec<AgentAnalysis>,
}

#[derive(Debug, Serialize)]
pub(super) struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub version: &'static str,
}
