//! Local persistence for the tracked portfolio and saved scenarios.
//!
//! State lives in memory behind a lock and, unless the store is memory-only,
//! every mutation is written through to a single JSON file before it becomes
//! visible to readers.

mod records;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

pub use records::{
    DEFAULT_SHARES, InvestmentItem, NewInvestment, NewScenario, PENDING_ANALYSIS, Scenario,
    ScenarioInputs, StoreData, ticker_for,
};

use crate::advisor::GeneratedPortfolio;
use crate::core::{HealthInputs, run_scenario_simulation};

const DEFAULT_RISK_SCORE: f64 = 4.0;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no record with id {0}")]
    NotFound(String),
}

#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    data: RwLock<StoreData>,
}

impl Store {
    /// Memory-only store; nothing survives the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(StoreData::default()),
        }
    }

    /// Loads `path`, or starts empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => StoreData::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "store file missing; starting empty");
                StoreData::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::info!(
            path = %path.display(),
            investments = data.investments.len(),
            scenarios = data.scenarios.len(),
            "store loaded"
        );
        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn snapshot(&self) -> StoreData {
        self.data.read().await.clone()
    }

    pub async fn investments(&self) -> Vec<InvestmentItem> {
        self.data.read().await.investments.clone()
    }

    pub async fn add_investment(&self, new: NewInvestment) -> Result<InvestmentItem, StoreError> {
        let item = new.into_item(Uuid::new_v4().to_string(), Utc::now());
        self.update(|data| {
            data.investments.push(item.clone());
            Ok(())
        })
        .await?;
        tracing::info!(id = %item.id, ticker = %item.ticker, "investment added");
        Ok(item)
    }

    pub async fn remove_investment(&self, id: &str) -> Result<(), StoreError> {
        self.update(|data| {
            let before = data.investments.len();
            data.investments.retain(|item| item.id != id);
            if data.investments.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })
        .await
    }

    pub async fn generated_portfolio(&self) -> Option<GeneratedPortfolio> {
        self.data.read().await.generated_portfolio.clone()
    }

    pub async fn set_generated_portfolio(
        &self,
        portfolio: GeneratedPortfolio,
    ) -> Result<(), StoreError> {
        self.update(|data| {
            data.generated_portfolio = Some(portfolio);
            Ok(())
        })
        .await
    }

    pub async fn clear_generated_portfolio(&self) -> Result<(), StoreError> {
        self.update(|data| {
            data.generated_portfolio = None;
            Ok(())
        })
        .await
    }

    pub async fn scenarios(&self) -> Vec<Scenario> {
        self.data.read().await.scenarios.clone()
    }

    /// Projects `new` and saves it with a pending analysis note.
    pub async fn add_scenario(&self, new: NewScenario) -> Result<Scenario, StoreError> {
        let result = run_scenario_simulation(
            new.kind,
            new.inputs.capital,
            new.inputs.monthly_contribution,
            new.inputs.risk_profile,
        );
        let scenario = Scenario {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            inputs: new.inputs,
            result,
            ai_analysis: PENDING_ANALYSIS.to_string(),
        };
        self.update(|data| {
            data.scenarios.push(scenario.clone());
            Ok(())
        })
        .await?;
        Ok(scenario)
    }

    pub async fn remove_scenario(&self, id: &str) -> Result<(), StoreError> {
        self.update(|data| {
            let before = data.scenarios.len();
            data.scenarios.retain(|scenario| scenario.id != id);
            if data.scenarios.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })
        .await
    }

    /// Annotates every saved scenario with its comparison note.
    pub async fn compare_scenarios(&self) -> Result<Vec<Scenario>, StoreError> {
        self.update(|data| {
            for scenario in &mut data.scenarios {
                scenario.ai_analysis = Scenario::comparison_note(scenario.kind).to_string();
            }
            Ok(data.scenarios.clone())
        })
        .await
    }

    pub async fn dashboard_health_inputs(&self) -> HealthInputs {
        let data = self.data.read().await;
        dashboard_health_inputs(&data)
    }

    /// Applies `change` to a copy, persists the copy, then publishes it.
    async fn update<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(value)
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_error = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let content = serde_json::to_string_pretty(data)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, content)
            .await
            .map_err(io_error)?;
        tokio::fs::rename(&staging, path).await.map_err(io_error)?;
        tracing::debug!(path = %path.display(), "store persisted");
        Ok(())
    }
}

/// Health scorer inputs derived from what the user has saved.
///
/// Without any saved data the dashboard shows a demo profile.
pub fn dashboard_health_inputs(data: &StoreData) -> HealthInputs {
    let portfolio_value = match &data.generated_portfolio {
        Some(portfolio) => portfolio.total_amount,
        None => data.investments.iter().map(|item| item.cost_basis).sum(),
    };

    let risk_score = match &data.generated_portfolio {
        Some(portfolio) => portfolio.risk_score,
        None if !data.investments.is_empty() => {
            let total: f64 = data
                .investments
                .iter()
                .map(|item| 10.0 - item.fundability_score / 10.0)
                .sum();
            (total / data.investments.len() as f64).round()
        }
        None => DEFAULT_RISK_SCORE,
    };

    let has_data = data.generated_portfolio.is_some() || !data.investments.is_empty();
    let (runway_months, net_worth, monthly_burn) = if has_data {
        (14.0, portfolio_value * 1.6, (portfolio_value * 0.03).max(3000.0))
    } else {
        (18.0, 125_000.0, 4000.0)
    };

    HealthInputs {
        net_worth: Some(net_worth),
        monthly_burn: Some(monthly_burn),
        runway_months: Some(runway_months),
        portfolio_value: Some(if portfolio_value > 0.0 {
            portfolio_value
        } else {
            75_000.0
        }),
        risk_score: Some(risk_score),
    }
}
