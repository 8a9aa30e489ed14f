use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::extract::{ObjectSpan, parse_lenient};
use super::{Advisor, ProviderTag};
use crate::core::AllocationEntry;

const SYSTEM_PROMPT: &str = "You are an expert wealth manager. Design an investment portfolio \
for the investor profile you are given and reply with a single JSON object and nothing else.";

/// Body of `POST /api/portfolio/generate`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratePortfolioRequest {
    pub amount: Option<f64>,
    pub risk: Option<String>,
    pub horizon: Option<String>,
    pub goal: Option<String>,
}

/// A validated request: positive amount and a named risk tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorProfile {
    pub amount: f64,
    pub risk: String,
    pub horizon: String,
    pub goal: String,
}

impl GeneratePortfolioRequest {
    pub fn into_profile(self) -> Option<InvestorProfile> {
        let amount = self.amount.filter(|a| a.is_finite() && *a > 0.0)?;
        let risk = self.risk.filter(|r| !r.trim().is_empty())?;
        Some(InvestorProfile {
            amount,
            risk,
            horizon: self.horizon.unwrap_or_default(),
            goal: self.goal.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPortfolio {
    pub strategy_name: String,
    pub description: String,
    pub expected_return: String,
    pub risk_score: f64,
    pub allocation: Vec<AllocationEntry>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default = "fallback_provider")]
    pub provider: ProviderTag,
}

fn fallback_provider() -> ProviderTag {
    ProviderTag::Fallback
}

fn entry(symbol: &str, name: &str, percentage: f64, asset_type: &str, reasoning: &str) -> AllocationEntry {
    AllocationEntry {
        symbol: symbol.to_string(),
        name: name.to_string(),
        percentage,
        asset_type: asset_type.to_string(),
        reasoning: reasoning.to_string(),
    }
}

pub fn fallback_portfolio(amount: f64) -> GeneratedPortfolio {
    GeneratedPortfolio {
        strategy_name: "Balanced Growth (Fallback)".to_string(),
        description: "A fallback strategy due to AI generation error.".to_string(),
        expected_return: "5-7%".to_string(),
        risk_score: 5.0,
        allocation: vec![
            entry("VTI", "Total Stock Market", 50.0, "ETF", "Broad market exposure"),
            entry("BND", "Total Bond Market", 40.0, "ETF", "Stability"),
            entry("GLD", "Gold", 10.0, "Commodity", "Hedge"),
        ],
        total_amount: amount,
        provider: ProviderTag::Fallback,
    }
}

fn user_prompt(profile: &InvestorProfile) -> String {
    format!(
        "Investment amount: ${amount}\n\
         Risk tolerance: {risk} (Low/Medium/High)\n\
         Time horizon: {horizon}\n\
         Goal: {goal}\n\n\
         Return JSON shaped like:\n\
         {{\n  \"strategyName\": \"e.g. Aggressive Growth\",\n  \
         \"description\": \"two sentence summary\",\n  \
         \"expectedReturn\": \"e.g. 8-10% annually\",\n  \
         \"riskScore\": number from 1 to 10,\n  \
         \"allocation\": [\n    {{ \"symbol\": \"SPY\", \"name\": \"asset name\", \
         \"percentage\": 0-100, \"type\": \"Stock/Bond/Crypto/ETF\", \
         \"reasoning\": \"short reason\" }}\n  ]\n}}\n\
         Allocation percentages must sum to 100.",
        amount = profile.amount,
        risk = profile.risk,
        horizon = profile.horizon,
        goal = profile.goal,
    )
}

impl Advisor {
    pub async fn generate_portfolio(&self, profile: &InvestorProfile) -> GeneratedPortfolio {
        let options = self.options(None, Duration::ZERO);
        let outcome = self
            .complete(SYSTEM_PROMPT, &user_prompt(profile), options, |text| {
                parse_lenient::<GeneratedPortfolio>(text, ObjectSpan::Widest)
                    .filter(|portfolio| !portfolio.allocation.is_empty())
            })
            .await;

        match outcome {
            Ok((portfolio, provider)) => GeneratedPortfolio {
                total_amount: profile.amount,
                provider,
                ..portfolio
            },
            Err(err) => {
                tracing::warn!(error = %err, "portfolio generation using fallback strategy");
                fallback_portfolio(profile.amount)
            }
        }
    }
}
