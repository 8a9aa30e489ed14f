use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::extract::{ObjectSpan, parse_lenient};
use super::{Advisor, ProviderTag};
use crate::core::FinancialSnapshot;

const FALLBACK_REVENUE: f64 = 25_000.0;
const FALLBACK_BURN: f64 = 40_000.0;
const FALLBACK_GROWTH: f64 = 8.0;
const FALLBACK_TEAM: u32 = 5;
const FALLBACK_CASH_MONTHS: f64 = 12.0;

const MAX_TOKENS: u32 = 300;

const SYSTEM_PROMPT: &str = "You are a venture capital analyst building financial models for \
early-stage startups. Respond with a single JSON object and nothing else.";

fn user_prompt(idea: &str) -> String {
    format!(
        "Startup idea: {idea}\n\n\
         Produce a realistic monthly financial model as JSON:\n\
         {{\n  \"revenue\": monthly revenue,\n  \"burn\": monthly burn,\n  \
         \"growth\": monthly growth percent,\n  \"team\": employees,\n  \
         \"cash\": cash in bank\n}}\n\n\
         Keep revenue within 5k-100k, burn within 20k-150k, growth within 2-20, \
         team within 2-15 and cash at 6-18 months of burn.\n\
         Answer with JSON only."
    )
}

/// Model output before normalisation. Every field must be a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawBaseline {
    pub revenue: f64,
    pub burn: f64,
    pub growth: f64,
    pub team: f64,
    pub cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBaseline {
    #[serde(flatten)]
    pub snapshot: FinancialSnapshot,
    pub provider: ProviderTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedBaseline {
    pub fn fallback(error: Option<&str>) -> Self {
        Self {
            snapshot: fallback_snapshot(),
            provider: ProviderTag::Fallback,
            error: error.map(str::to_string),
        }
    }
}

/// Fixed baseline used whenever no provider produced a usable model.
pub fn fallback_snapshot() -> FinancialSnapshot {
    FinancialSnapshot::from_metrics(
        FALLBACK_REVENUE,
        FALLBACK_BURN,
        FALLBACK_GROWTH,
        FALLBACK_TEAM,
        FALLBACK_BURN * FALLBACK_CASH_MONTHS,
    )
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Pulls model output into realistic ranges and derives runway and score.
///
/// Burn is kept within 0.5x..3x revenue and cash within 6..24 months of
/// burn; values outside are pulled to 0.7x / 2x revenue and 8 / 18 months.
pub fn normalize_baseline(raw: RawBaseline) -> FinancialSnapshot {
    let revenue = positive(raw.revenue).unwrap_or(FALLBACK_REVENUE);
    let growth = positive(raw.growth).unwrap_or(FALLBACK_GROWTH);
    let team = positive(raw.team)
        .map(|team| team.round() as u32)
        .unwrap_or(FALLBACK_TEAM);

    let mut burn = positive(raw.burn).unwrap_or(FALLBACK_BURN);
    if burn > revenue * 3.0 {
        burn = (revenue * 2.0).round();
    }
    if burn < revenue * 0.5 {
        burn = (revenue * 0.7).round();
    }

    let mut cash = positive(raw.cash).unwrap_or(burn * FALLBACK_CASH_MONTHS);
    if cash > burn * 24.0 {
        cash = burn * 18.0;
    }
    if cash < burn * 6.0 {
        cash = burn * 8.0;
    }

    FinancialSnapshot::from_metrics(revenue, burn, growth, team, cash)
}

impl Advisor {
    /// Turns a free-text idea into a baseline snapshot.
    pub async fn generate_baseline(&self, idea: &str) -> GeneratedBaseline {
        let idea = idea.trim();
        if idea.is_empty() {
            return GeneratedBaseline::fallback(Some("No idea provided"));
        }

        let options = self.options(Some(MAX_TOKENS), Duration::ZERO);
        let outcome = self
            .complete(SYSTEM_PROMPT, &user_prompt(idea), options, |text| {
                parse_lenient::<RawBaseline>(text, ObjectSpan::Shortest)
            })
            .await;

        match outcome {
            Ok((raw, provider)) => GeneratedBaseline {
                snapshot: normalize_baseline(raw),
                provider,
                error: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "baseline generation using fallback values");
                GeneratedBaseline::fallback(None)
            }
        }
    }
}
