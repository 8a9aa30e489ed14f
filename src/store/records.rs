use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advisor::GeneratedPortfolio;
use crate::core::{RiskProfile, ScenarioResult, ScenarioType};

pub const DEFAULT_SHARES: u32 = 1000;
pub const PENDING_ANALYSIS: &str = "Select 'Compare' to analyze.";

const TICKER_LEN: usize = 4;

/// A startup saved to the tracked portfolio from an investment thesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentItem {
    pub id: String,
    pub startup_name: String,
    pub ticker: String,
    pub valuation: f64,
    pub ask_amount: f64,
    pub equity: f64,
    pub shares: u32,
    pub cost_basis: f64,
    pub thesis_summary: String,
    pub fundability_score: f64,
    pub risk: String,
    pub roi: String,
    pub date_added: DateTime<Utc>,
}

/// Body of `POST /api/portfolio/investments`; the store fills in the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewInvestment {
    pub startup_name: String,
    pub valuation: f64,
    pub ask_amount: f64,
    pub equity: f64,
    pub thesis_summary: String,
    pub fundability_score: f64,
    pub risk: String,
    #[serde(alias = "expectedROI")]
    pub roi: String,
}

impl NewInvestment {
    pub(super) fn into_item(self, id: String, now: DateTime<Utc>) -> InvestmentItem {
        InvestmentItem {
            id,
            ticker: ticker_for(&self.startup_name),
            shares: DEFAULT_SHARES,
            cost_basis: self.ask_amount,
            date_added: now,
            startup_name: self.startup_name,
            valuation: self.valuation,
            ask_amount: self.ask_amount,
            equity: self.equity,
            thesis_summary: self.thesis_summary,
            fundability_score: self.fundability_score,
            risk: self.risk,
            roi: self.roi,
        }
    }
}

pub fn ticker_for(name: &str) -> String {
    name.chars().take(TICKER_LEN).collect::<String>().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInputs {
    pub capital: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    pub risk_profile: RiskProfile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewScenario {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScenarioType,
    pub inputs: ScenarioInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScenarioType,
    pub inputs: ScenarioInputs,
    pub result: ScenarioResult,
    pub ai_analysis: String,
}

impl Scenario {
    pub fn comparison_note(kind: ScenarioType) -> &'static str {
        match kind {
            ScenarioType::Startup => {
                "High risk, potentially high reward. Success depends on execution."
            }
            ScenarioType::Invest | ScenarioType::Hybrid => {
                "Steady growth expected. Good for wealth preservation."
            }
        }
    }
}

/// Everything the store persists, in on-disk shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreData {
    pub investments: Vec<InvestmentItem>,
    pub generated_portfolio: Option<GeneratedPortfolio>,
    pub scenarios: Vec<Scenario>,
}
