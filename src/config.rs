use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::advisor::{
    AdvisorConfig, GROQ_ENDPOINT, OPENROUTER_ENDPOINT, ProviderConfig, ProviderTag,
    fallback_snapshot,
};
use crate::core::{FinancialSnapshot, FounderControls, StressTestControls};

#[derive(Debug, Parser)]
#[command(
    name = "buildsim",
    version,
    about = "Startup financial simulator with AI-assisted baselines and advice"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON API over HTTP.
    Serve(ServeArgs),
    /// Run the layered engine once and print the result as JSON.
    Simulate(SimulateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "BUILDSIM_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "BUILDSIM_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(
        long,
        env = "OPENROUTER_MODEL",
        default_value = "mistralai/mistral-7b-instruct"
    )]
    pub openrouter_model: String,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "GROQ_MODEL", default_value = "llama3-8b-8192")]
    pub groq_model: String,

    #[arg(
        long,
        env = "BUILDSIM_PROVIDER_TIMEOUT_SECS",
        default_value_t = 15,
        help = "Per-request timeout for AI providers; advice gets 5 extra seconds"
    )]
    pub provider_timeout_secs: u64,

    #[arg(
        long,
        env = "BUILDSIM_FORCE_FALLBACK",
        help = "Skip every AI provider and answer with deterministic fallbacks"
    )]
    pub force_fallback: bool,

    #[arg(long, env = "BUILDSIM_DATA_FILE", default_value = "buildsim-data.json")]
    pub data_file: PathBuf,

    #[arg(long, help = "Keep portfolio and scenarios in memory only")]
    pub in_memory: bool,
}

impl ServeArgs {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Provider chain in fallback order. Providers without a key are left out.
    pub fn advisor_config(&self) -> AdvisorConfig {
        let candidates = [
            (
                ProviderTag::OpenRouter,
                OPENROUTER_ENDPOINT,
                &self.openrouter_api_key,
                &self.openrouter_model,
            ),
            (
                ProviderTag::Groq,
                GROQ_ENDPOINT,
                &self.groq_api_key,
                &self.groq_model,
            ),
        ];

        let providers = candidates
            .into_iter()
            .filter_map(|(tag, endpoint, key, model)| {
                match key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
                    Some(key) => Some(ProviderConfig {
                        tag,
                        endpoint: endpoint.to_string(),
                        api_key: key.to_string(),
                        model: model.clone(),
                    }),
                    None => {
                        tracing::warn!(provider = %tag, "no API key configured; provider skipped");
                        None
                    }
                }
            })
            .collect();

        AdvisorConfig {
            providers,
            timeout: Duration::from_secs(self.provider_timeout_secs),
            force_fallback: self.force_fallback,
        }
    }
}

/// Offline engine run. Baseline metrics left unset take the fallback
/// baseline's values.
#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    #[arg(long, help = "Monthly revenue")]
    pub revenue: Option<f64>,
    #[arg(long, help = "Monthly burn")]
    pub burn: Option<f64>,
    #[arg(long, help = "Monthly growth in percent")]
    pub growth: Option<f64>,
    #[arg(long)]
    pub team: Option<u32>,
    #[arg(long, help = "Cash in bank")]
    pub cash: Option<f64>,

    #[arg(long, help = "Replace baseline cash with this starting capital")]
    pub starting_capital: Option<f64>,
    #[arg(long, default_value_t = 0)]
    pub planned_hires: u32,
    #[arg(long, default_value_t = 0.0)]
    pub marketing_budget: f64,

    #[arg(long)]
    pub recession: bool,
    #[arg(long, default_value_t = 0.0, help = "Ad cost increase in percent")]
    pub ad_cost_increase: f64,
    #[arg(long, default_value_t = 0)]
    pub hiring_expansion: u32,
    #[arg(long, default_value_t = 0.0, help = "Growth slowdown in percentage points")]
    pub growth_slowdown: f64,
}

impl SimulateArgs {
    pub fn baseline(&self) -> FinancialSnapshot {
        let fallback = fallback_snapshot();
        FinancialSnapshot::from_metrics(
            self.revenue.unwrap_or(fallback.revenue),
            self.burn.unwrap_or(fallback.burn),
            self.growth.unwrap_or(fallback.growth),
            self.team.unwrap_or(fallback.team),
            self.cash.unwrap_or(fallback.cash),
        )
    }

    pub fn founder_controls(&self) -> FounderControls {
        FounderControls {
            starting_capital_override: self.starting_capital,
            planned_hires: self.planned_hires,
            monthly_marketing_budget: self.marketing_budget,
        }
    }

    pub fn stress_controls(&self) -> StressTestControls {
        StressTestControls {
            recession: self.recession,
            ad_cost_increase_percent: self.ad_cost_increase,
            hiring_expansion: self.hiring_expansion,
            growth_slowdown_percent: self.growth_slowdown,
        }
    }
}
