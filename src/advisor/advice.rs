use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::extract::{ObjectSpan, parse_lenient};
use super::{Advisor, ProviderTag};
use crate::core::StressTestControls;

const DEFAULT_RUNWAY: f64 = 12.0;
const DEFAULT_BURN: f64 = 40_000.0;
const DEFAULT_REVENUE: f64 = 25_000.0;
const DEFAULT_GROWTH: f64 = 8.0;

const MAX_TOKENS: u32 = 600;
const EXTRA_TIMEOUT: Duration = Duration::from_secs(5);

const SYSTEM_PROMPT: &str = "You are a startup CFO who also invests in early-stage companies. \
Given financial metrics and market conditions, give concrete, realistic strategy advice. \
Be brief and practical and skip motivational filler.";

/// Body of `POST /api/advice`. Everything is optional; the fallback path
/// fills gaps with defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdviceRequest {
    pub idea: Option<String>,
    pub revenue: Option<f64>,
    pub burn: Option<f64>,
    pub runway: Option<f64>,
    pub growth: Option<f64>,
    pub team: Option<f64>,
    pub survival_score: Option<f64>,
    pub scenario: StressTestControls,
}

impl AdviceRequest {
    fn idea(&self) -> Option<&str> {
        self.idea
            .as_deref()
            .map(str::trim)
            .filter(|idea| !idea.is_empty())
    }

    fn user_prompt(&self, idea: &str) -> String {
        let show = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        let scenario = &self.scenario;
        format!(
            "Startup idea: {idea}\n\n\
             Metrics:\n\
             Revenue: {revenue}\n\
             Burn: {burn}\n\
             Runway months: {runway}\n\
             Growth: {growth}%\n\
             Team size: {team}\n\
             Survival score: {score}\n\n\
             Scenario:\n\
             Recession: {recession}\n\
             Ad cost increase: {ad}%\n\
             Hiring increase: {hires}\n\
             Growth slowdown: {slowdown}%\n\n\
             Cover, in order: a survival assessment in one or two sentences, cost \
             adjustments, hiring advice, when to raise, and a short investor memo.\n\n\
             Reply with JSON only:\n\
             {{\n  \"assessment\": \"...\",\n  \"costAdvice\": \"...\",\n  \
             \"hiringAdvice\": \"...\",\n  \"fundingAdvice\": \"...\",\n  \
             \"investorMemo\": \"...\"\n}}",
            revenue = show(self.revenue),
            burn = show(self.burn),
            runway = show(self.runway),
            growth = show(self.growth),
            team = show(self.team),
            score = show(self.survival_score),
            recession = scenario.recession,
            ad = scenario.ad_cost_increase_percent,
            hires = scenario.hiring_expansion,
            slowdown = scenario.growth_slowdown_percent,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub assessment: String,
    pub cost_advice: String,
    pub hiring_advice: String,
    pub funding_advice: String,
    pub investor_memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    pub advice: Advice,
    pub provider: ProviderTag,
}

fn non_zero(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

/// Template advice built purely from the four headline metrics.
pub fn fallback_advice(runway: f64, burn: f64, revenue: f64, growth: f64) -> Advice {
    let assessment = if runway < 10.0 {
        "Your startup is in a critical cash position. Immediate cost reduction is essential."
    } else if runway < 15.0 {
        "Your runway is moderate, but you should begin preparing for fundraising now."
    } else {
        "Your cash position is relatively healthy. Focus on growth efficiency."
    };

    let cost_advice = if burn > revenue {
        "Cut non-essential spending immediately. Reduce marketing spend by 30% and renegotiate \
         vendor contracts. Consider moving to a cheaper office or going fully remote."
    } else {
        "Your burn-to-revenue ratio is manageable. Look for 10-15% cost optimizations in \
         infrastructure and tooling."
    };

    let hiring_advice = if growth > 10.0 {
        "Growth justifies selective hiring. Focus on revenue-generating roles first: sales and \
         customer success."
    } else {
        "Freeze non-critical hiring. Only hire for roles that directly impact revenue or product \
         delivery."
    };

    let funding_advice = if runway < 12.0 {
        "Start fundraising immediately. You need at least 6 months of runway buffer before \
         approaching investors."
    } else {
        "Begin investor conversations 4-6 months before you need capital. Build relationships \
         now, close later."
    };

    let investor_memo = format!(
        "Early-stage startup generating ${mrr}K MRR with {growth}% monthly growth. Current runway \
         of {runway} months with a burn rate of ${burn_k}K/mo. The team should focus on improving \
         unit economics and reaching profitability milestones before the next raise.",
        mrr = (revenue / 1000.0).round(),
        burn_k = (burn / 1000.0).round(),
    );

    Advice {
        assessment: assessment.to_string(),
        cost_advice: cost_advice.to_string(),
        hiring_advice: hiring_advice.to_string(),
        funding_advice: funding_advice.to_string(),
        investor_memo,
    }
}

impl Advisor {
    /// Strategy advice for a simulated startup. Never fails.
    pub async fn generate_advice(&self, request: &AdviceRequest) -> AdviceResponse {
        let Some(idea) = request.idea() else {
            return AdviceResponse {
                advice: fallback_advice(DEFAULT_RUNWAY, DEFAULT_BURN, DEFAULT_REVENUE, DEFAULT_GROWTH),
                provider: ProviderTag::Fallback,
            };
        };

        let options = self.options(Some(MAX_TOKENS), EXTRA_TIMEOUT);
        let outcome = self
            .complete(SYSTEM_PROMPT, &request.user_prompt(idea), options, |text| {
                parse_lenient::<Advice>(text, ObjectSpan::Widest)
            })
            .await;

        match outcome {
            Ok((advice, provider)) => AdviceResponse { advice, provider },
            Err(err) => {
                tracing::warn!(error = %err, "advice generation using fallback template");
                AdviceResponse {
                    advice: fallback_advice(
                        non_zero(request.runway, DEFAULT_RUNWAY),
                        non_zero(request.burn, DEFAULT_BURN),
                        non_zero(request.revenue, DEFAULT_REVENUE),
                        non_zero(request.growth, DEFAULT_GROWTH),
                    ),
                    provider: ProviderTag::Fallback,
                }
            }
        }
    }
}
