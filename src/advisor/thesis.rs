use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::extract::{ObjectSpan, parse_lenient};
use super::{Advisor, ProviderTag};

const SYSTEM_PROMPT: &str = "You are a venture capital associate writing short investment \
theses for pre-seed and seed startups. Estimate a realistic pre-money valuation and raise for \
the metrics you are given. Reply with a single JSON object and nothing else.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartupMetrics {
    pub runway_months: f64,
    pub monthly_burn: f64,
    pub survival_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThesisRequest {
    pub startup_data: Option<StartupMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentThesis {
    pub valuation: f64,
    pub ask_amount: f64,
    /// Percentage points offered for the ask.
    pub equity: f64,
    #[serde(rename = "expectedROI", alias = "expectedRoi")]
    pub expected_roi: String,
    pub risk: String,
    pub summary: String,
    #[serde(default)]
    pub comparable: Vec<String>,
    #[serde(default = "fallback_provider", skip_deserializing)]
    pub provider: ProviderTag,
}

fn fallback_provider() -> ProviderTag {
    ProviderTag::Fallback
}

pub fn fallback_thesis() -> InvestmentThesis {
    InvestmentThesis {
        valuation: 2_000_000.0,
        ask_amount: 500_000.0,
        equity: 20.0,
        expected_roi: "Unknown".to_string(),
        risk: "High".to_string(),
        summary: "Analysis failed. Proceed with caution.".to_string(),
        comparable: vec!["Unknown".to_string()],
        provider: ProviderTag::Fallback,
    }
}

fn user_prompt(metrics: &StartupMetrics) -> String {
    format!(
        "Runway: {runway} months\n\
         Monthly burn: ${burn}\n\
         Survival probability: {score}%\n\n\
         Return JSON shaped like:\n\
         {{\n  \"valuation\": 2000000,\n  \"askAmount\": 500000,\n  \"equity\": 15,\n  \
         \"expectedROI\": \"10x in 5 years\",\n  \"risk\": \"Low\" | \"Medium\" | \"High\",\n  \
         \"summary\": \"two or three sentences on why this is a good or bad deal\",\n  \
         \"comparable\": [\"Comp 1\", \"Comp 2\"]\n}}",
        runway = metrics.runway_months,
        burn = metrics.monthly_burn,
        score = metrics.survival_score,
    )
}

impl Advisor {
    pub async fn investment_thesis(&self, metrics: &StartupMetrics) -> InvestmentThesis {
        let options = self.options(None, Duration::ZERO);
        let outcome = self
            .complete(SYSTEM_PROMPT, &user_prompt(metrics), options, |text| {
                parse_lenient::<InvestmentThesis>(text, ObjectSpan::Widest)
            })
            .await;

        match outcome {
            Ok((thesis, provider)) => InvestmentThesis { provider, ..thesis },
            Err(err) => {
                tracing::warn!(error = %err, "investment thesis using fallback values");
                fallback_thesis()
            }
        }
    }
}
