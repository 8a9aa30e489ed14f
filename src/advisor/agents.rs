use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use super::extract::{ObjectSpan, parse_lenient};
use super::{Advisor, ProviderTag};

const OFFLINE_KEY_POINTS: [&str; 3] = [
    "Check API keys",
    "Verify internet connection",
    "Try again later",
];

/// Canned answer a persona gives when no provider is reachable.
#[derive(Debug, Clone, Copy)]
pub struct OfflineVerdict {
    pub summary: &'static str,
    pub recommendation: &'static str,
    pub risk_level: f64,
}

/// One advisor on the panel.
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Character sketch; the answer format is appended by `system_prompt`.
    pub outlook: &'static str,
    /// What a 10 on this persona's risk scale means.
    pub worst_case: &'static str,
    pub offline: OfflineVerdict,
}

pub const PERSONAS: [Persona; 5] = [
    Persona {
        id: "cfo",
        name: "Chief Financial Officer",
        role: "CFO",
        icon: "💼",
        color: "blue",
        outlook: "You are a conservative, numbers-driven CFO. You care about financial \
                  survival, a longer runway and cutting unnecessary burn, and you reason from \
                  hard data and risk mitigation.",
        worst_case: "bankrupt/disaster",
        offline: OfflineVerdict {
            summary: "I cannot audit this scenario without a live AI connection. However, \
                      standard procedure dictates preserving cash and reviewing burn rate \
                      immediately.",
            recommendation: "Review runway and cut non-essential costs.",
            risk_level: 8.0,
        },
    },
    Persona {
        id: "vc",
        name: "Venture Capitalist",
        role: "VC",
        icon: "🚀",
        color: "purple",
        outlook: "You are an aggressive, growth-obsessed venture capitalist. Market size, \
                  scalability and unicorn potential matter most to you, and you will happily \
                  burn cash to buy growth.",
        worst_case: "missed opportunity",
        offline: OfflineVerdict {
            summary: "The growth potential is unclear without market data. I need the AI \
                      engine to evaluate the Total Addressable Market (TAM).",
            recommendation: "Focus on scalability arguments until the system is online.",
            risk_level: 9.0,
        },
    },
    Persona {
        id: "wealth",
        name: "Wealth Manager",
        role: "Advisor",
        icon: "🏛️",
        color: "emerald",
        outlook: "You are a balanced, long-term wealth manager. You believe in diversification, \
                  compounding and patience, and you prefer steady, predictable returns over \
                  get-rich-quick schemes.",
        worst_case: "complete loss of capital",
        offline: OfflineVerdict {
            summary: "Standard automated response. System offline.",
            recommendation: "Diversify and hold.",
            risk_level: 3.0,
        },
    },
    Persona {
        id: "risk",
        name: "Risk Manager",
        role: "Risk",
        icon: "🛡️",
        color: "red",
        outlook: "You are a paranoid risk manager whose job is to find what could go wrong: \
                  exposed downsides, missing insurance, single points of failure and \
                  over-leverage.",
        worst_case: "catastrophic failure",
        offline: OfflineVerdict {
            summary: "System outage detected. This represents a significant operational risk. \
                      We are operating blind.",
            recommendation: "Halt all major decisions until intelligence is restored.",
            risk_level: 10.0,
        },
    },
    Persona {
        id: "trader",
        name: "Day Trader",
        role: "Trader",
        icon: "📈",
        color: "orange",
        outlook: "You are a tactical, momentum-driven day trader. Timing, sentiment and \
                  short-term liquidity are all you care about; the long term is irrelevant.",
        worst_case: "getting wrecked",
        offline: OfflineVerdict {
            summary: "Market feed down. No signal. I can't see the charts!",
            recommendation: "Stay flat (cash) until the data feed returns.",
            risk_level: 5.0,
        },
    },
];

impl Persona {
    fn system_prompt(&self) -> String {
        format!(
            "{outlook}\n\n\
             Analyze the user's financial scenario and reply with JSON only:\n\
             {{\n  \"summary\": \"at most two sentences\",\n  \
             \"recommendation\": \"one direct, actionable sentence\",\n  \
             \"riskLevel\": number from 1 to 10 where 10 is {worst},\n  \
             \"keyPoints\": [\"point 1\", \"point 2\", \"point 3\"]\n}}",
            outlook = self.outlook,
            worst = self.worst_case,
        )
    }

    fn analysis(&self, provider: ProviderTag, verdict: Verdict) -> AgentAnalysis {
        AgentAnalysis {
            agent_id: self.id.to_string(),
            name: self.name.to_string(),
            icon: self.icon.to_string(),
            role: self.role.to_string(),
            color: self.color.to_string(),
            provider,
            summary: verdict.summary,
            recommendation: verdict.recommendation,
            risk_level: verdict.risk_level,
            key_points: verdict.key_points,
            error: false,
        }
    }

    fn offline_analysis(&self) -> AgentAnalysis {
        self.analysis(
            ProviderTag::Fallback,
            Verdict {
                summary: self.offline.summary.to_string(),
                recommendation: self.offline.recommendation.to_string(),
                risk_level: self.offline.risk_level,
                key_points: OFFLINE_KEY_POINTS.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    fn format_error_analysis(&self, provider: ProviderTag) -> AgentAnalysis {
        self.analysis(
            provider,
            Verdict {
                summary: "AI response format error.".to_string(),
                recommendation: "Consult raw logs.".to_string(),
                risk_level: 5.0,
                key_points: vec!["Format Error".to_string()],
            },
        )
    }

    fn failed_analysis(&self) -> AgentAnalysis {
        AgentAnalysis {
            error: true,
            ..self.analysis(
                ProviderTag::Fallback,
                Verdict {
                    summary: "Agent failed to respond.".to_string(),
                    recommendation: "System error.".to_string(),
                    risk_level: 0.0,
                    key_points: Vec::new(),
                },
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Verdict {
    summary: String,
    recommendation: String,
    risk_level: f64,
    #[serde(default)]
    key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAnalysis {
    pub agent_id: String,
    pub name: String,
    pub icon: String,
    pub role: String,
    pub color: String,
    pub provider: ProviderTag,
    pub summary: String,
    pub recommendation: String,
    pub risk_level: f64,
    pub key_points: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Advisor {
    /// Asks a single persona about `scenario`.
    ///
    /// The first provider that returns any content decides the answer; if
    /// that content is not a verdict the persona reports a format error
    /// instead of trying the next provider.
    pub async fn consult(&self, persona: &Persona, scenario: &str) -> AgentAnalysis {
        let options = self.options(None, Duration::ZERO);
        let outcome = self
            .complete(&persona.system_prompt(), scenario, options, |text| {
                Some(parse_lenient::<Verdict>(text, ObjectSpan::Widest))
            })
            .await;

        match outcome {
            Ok((Some(verdict), provider)) => persona.analysis(provider, verdict),
            Ok((None, provider)) => {
                tracing::warn!(agent = persona.id, %provider, "agent answer was not valid JSON");
                persona.format_error_analysis(provider)
            }
            Err(err) => {
                tracing::warn!(agent = persona.id, error = %err, "agent using offline answer");
                persona.offline_analysis()
            }
        }
    }

    /// Consults every persona concurrently; results come back in panel order.
    pub async fn consult_panel(self: &Arc<Self>, scenario: &str) -> Vec<AgentAnalysis> {
        let mut tasks = JoinSet::new();
        for (index, persona) in PERSONAS.into_iter().enumerate() {
            let advisor = Arc::clone(self);
            let scenario = scenario.to_string();
            tasks.spawn(async move { (index, advisor.consult(&persona, &scenario).await) });
        }

        let mut slots: Vec<Option<AgentAnalysis>> = vec![None; PERSONAS.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, analysis)) => slots[index] = Some(analysis),
                Err(err) => tracing::error!(error = %err, "agent task failed"),
            }
        }

        slots
            .into_iter()
            .zip(PERSONAS.iter())
            .map(|(slot, persona)| slot.unwrap_or_else(|| persona.failed_analysis()))
            .collect()
    }
}
