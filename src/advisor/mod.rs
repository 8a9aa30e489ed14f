//! AI-backed collaborators around the engine.
//!
//! Every public operation here degrades through the configured providers in
//! order and finally to deterministic fallback values, so callers always get
//! a usable answer. Provider failures are logged and swallowed.

mod advice;
mod agents;
mod allocation;
mod baseline;
mod client;
mod debate;
mod extract;
mod finbot;
mod thesis;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use advice::{Advice, AdviceRequest, AdviceResponse, fallback_advice};
pub use agents::{AgentAnalysis, OfflineVerdict, PERSONAS, Persona};
pub use allocation::{
    GeneratePortfolioRequest, GeneratedPortfolio, InvestorProfile, fallback_portfolio,
};
pub use baseline::{GeneratedBaseline, RawBaseline, fallback_snapshot, normalize_baseline};
pub use debate::{Debate, DebateMessage};
pub use finbot::{ChatReply, ChatRequest};
pub use thesis::{InvestmentThesis, StartupMetrics, ThesisRequest, fallback_thesis};

use client::{ChatOptions, chat_completion};

pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}")]
    Status { provider: ProviderTag, status: u16 },

    #[error("{0} returned empty content")]
    EmptyContent(ProviderTag),

    #[error("{0} returned unparseable content")]
    Malformed(ProviderTag),

    #[error("no AI provider configured")]
    NoProviders,

    #[error("fallback forced by configuration")]
    ForcedFallback,
}

/// Which upstream answered, or `fallback` for the deterministic template.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    OpenRouter,
    Groq,
    Fallback,
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderTag::OpenRouter => "OpenRouter",
            ProviderTag::Groq => "Groq",
            ProviderTag::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub tag: ProviderTag,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Tried in order; the first usable answer wins.
    pub providers: Vec<ProviderConfig>,
    pub timeout: Duration,
    pub force_fallback: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            timeout: Duration::from_secs(15),
            force_fallback: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Advisor {
    http: reqwest::Client,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// An advisor with no providers; every call answers from fallbacks.
    pub fn offline() -> Self {
        Self {
            http: reqwest::Client::new(),
            config: AdvisorConfig::default(),
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Runs the provider chain, returning the first answer `parse` accepts.
    ///
    /// A provider that errors, times out, or produces content `parse`
    /// rejects is skipped. The error of the last attempt is returned when
    /// nothing answered.
    async fn complete<T, F>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: ChatOptions,
        parse: F,
    ) -> Result<(T, ProviderTag), AdvisorError>
    where
        F: Fn(&str) -> Option<T>,
    {
        if self.config.force_fallback {
            return Err(AdvisorError::ForcedFallback);
        }

        let mut last_error = AdvisorError::NoProviders;
        for provider in &self.config.providers {
            tracing::info!(provider = %provider.tag, "querying AI provider");
            let content =
                match chat_completion(&self.http, provider, system_prompt, user_prompt, options)
                    .await
                {
                    Ok(content) => content,
                    Err(err) => {
                        tracing::warn!(provider = %provider.tag, error = %err, "AI provider failed");
                        last_error = err;
                        continue;
                    }
                };

            tracing::debug!(
                provider = %provider.tag,
                raw = %content.chars().take(200).collect::<String>(),
                "AI provider answered"
            );

            match parse(&content) {
                Some(value) => return Ok((value, provider.tag)),
                None => {
                    tracing::warn!(provider = %provider.tag, "AI provider returned unparseable content");
                    last_error = AdvisorError::Malformed(provider.tag);
                }
            }
        }

        Err(last_error)
    }

    fn options(&self, max_tokens: Option<u32>, extra_timeout: Duration) -> ChatOptions {
        ChatOptions {
            max_tokens,
            timeout: self.config.timeout + extra_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_provider(tag: ProviderTag) -> ProviderConfig {
        ProviderConfig {
            tag,
            // Port 9 (discard) is closed on test hosts, so connect fails fast.
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
        }
    }

    #[tokio::test]
    async fn complete_without_providers_reports_no_providers() {
        let advisor = Advisor::offline();
        let result = advisor
            .complete("system", "user", advisor.options(None, Duration::ZERO), |s| {
                Some(s.to_string())
            })
            .await;
        assert!(matches!(result, Err(AdvisorError::NoProviders)));
    }

    #[tokio::test]
    async fn forced_fallback_skips_providers() {
        let advisor = Advisor::new(AdvisorConfig {
            providers: vec![unreachable_provider(ProviderTag::OpenRouter)],
            force_fallback: true,
            ..AdvisorConfig::default()
        })
        .expect("client builds");
        let result = advisor
            .complete("system", "user", advisor.options(None, Duration::ZERO), |s| {
                Some(s.to_string())
            })
            .await;
        assert!(matches!(result, Err(AdvisorError::ForcedFallback)));
    }

    #[tokio::test]
    async fn unreachable_providers_surface_transport_error() {
        let advisor = Advisor::new(AdvisorConfig {
            providers: vec![
                unreachable_provider(ProviderTag::OpenRouter),
                unreachable_provider(ProviderTag::Groq),
            ],
            timeout: Duration::from_secs(2),
            force_fallback: false,
        })
        .expect("client builds");
        let result = advisor
            .complete("system", "user", advisor.options(None, Duration::ZERO), |s| {
                Some(s.to_string())
            })
            .await;
        assert!(matches!(result, Err(AdvisorError::Http(_))));
    }

    #[test]
    fn provider_tag_serializes_lowercase() {
        let json = serde_json::to_string(&ProviderTag::OpenRouter).expect("serialize");
        assert_eq!(json, "\"openrouter\"");
        assert_eq!(ProviderTag::Groq.to_string(), "Groq");
    }
}
