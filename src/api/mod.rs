mod payload;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::advisor::{Advisor, AdviceRequest, ChatRequest, GeneratePortfolioRequest, ThesisRequest};
use crate::core::{
    FundabilityInput, HealthInputs, apply_founder_controls, calculate_fundability,
    calculate_health_score, calculate_stress_test, calculate_survival_score, fundability_rating,
    run_pipeline, run_scenario_simulation, run_stress_tests,
};
use crate::error::{ApiError, Result};
use crate::store::{NewInvestment, NewScenario, Store};

use payload::{
    AgentsPayload, AgentsResponse, ErrorResponse, FounderPayload, FundabilityResponse,
    GeneratePayload, HealthCheckResponse, PortfolioStressPayload, PortfolioStressResponse,
    ScenarioPayload, SimulatePayload, StressPayload, StressResponse, SurvivalPayload,
    SurvivalResponse,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub advisor: Arc<Advisor>,
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(advisor: Advisor, store: Store) -> Self {
        Self {
            advisor: Arc::new(advisor),
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        // AI-backed
        .route("/api/generate", post(generate_handler))
        .route("/api/advice", post(advice_handler))
        .route("/api/investment-thesis", post(investment_thesis_handler))
        .route("/api/agents", post(agents_handler))
        .route("/api/agents/debate", post(debate_handler))
        .route("/api/finbot", post(finbot_handler))
        .route("/api/portfolio/generate", post(generate_portfolio_handler))
        // Engine
        .route("/api/simulate", post(simulate_handler))
        .route("/api/survival", post(survival_handler))
        .route("/api/founder", post(founder_handler))
        .route("/api/stress", post(stress_handler))
        .route("/api/fundability", post(fundability_handler))
        .route("/api/health-score", post(health_score_handler))
        .route("/api/scenario", post(scenario_handler))
        .route("/api/portfolio/stress", post(portfolio_stress_handler))
        // Store
        .route(
            "/api/portfolio/investments",
            get(list_investments_handler).post(add_investment_handler),
        )
        .route(
            "/api/portfolio/investments/:id",
            delete(remove_investment_handler),
        )
        .route(
            "/api/portfolio/generated",
            get(generated_portfolio_handler).delete(clear_generated_portfolio_handler),
        )
        .route(
            "/api/scenarios",
            get(list_scenarios_handler).post(add_scenario_handler),
        )
        .route("/api/scenarios/:id", delete(remove_scenario_handler))
        .route("/api/scenarios/compare", post(compare_scenarios_handler))
        .route("/api/dashboard/health", get(dashboard_health_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "BuildSim HTTP API listening");
    axum::serve(listener, app).await
}

async fn health_check_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthCheckResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

// Baseline and advice always answer 200; an unreadable body is treated as
// an empty request and gets the fallback.
async fn generate_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: GeneratePayload = parse_body_or_default(&body);
    let baseline = state
        .advisor
        .generate_baseline(payload.idea.as_deref().unwrap_or_default())
        .await;
    json_response(StatusCode::OK, baseline)
}

async fn advice_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: AdviceRequest = parse_body_or_default(&body);
    json_response(StatusCode::OK, state.advisor.generate_advice(&request).await)
}

async fn investment_thesis_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response> {
    let request: ThesisRequest = parse_body(&body)?;
    let metrics = request
        .startup_data
        .ok_or_else(|| ApiError::BadRequest("Startup data is required".to_string()))?;
    let thesis = state.advisor.investment_thesis(&metrics).await;
    Ok(json_response(StatusCode::OK, thesis))
}

async fn agents_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let payload: AgentsPayload = parse_body(&body)?;
    let scenario = payload
        .scenario_text()
        .ok_or_else(|| ApiError::BadRequest("Scenario is required".to_string()))?;
    let analyses = state.advisor.consult_panel(&scenario).await;
    Ok(json_response(StatusCode::OK, AgentsResponse { analyses }))
}

async fn debate_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let payload: AgentsPayload = parse_body(&body)?;
    let scenario = payload
        .scenario_text()
        .ok_or_else(|| ApiError::BadRequest("Scenario is required".to_string()))?;
    let debate = state.advisor.debate(&scenario).await;
    Ok(json_response(StatusCode::OK, debate))
}

async fn finbot_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request: ChatRequest = parse_body(&body)?;
    let message = request
        .message()
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;
    Ok(json_response(StatusCode::OK, state.advisor.chat(message).await))
}

async fn generate_portfolio_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response> {
    let request: GeneratePortfolioRequest = parse_body(&body)?;
    let profile = request
        .into_profile()
        .ok_or_else(|| ApiError::BadRequest("Amount and risk are required".to_string()))?;
    let portfolio = state.advisor.generate_portfolio(&profile).await;
    state.store.set_generated_portfolio(portfolio.clone()).await?;
    Ok(json_response(StatusCode::OK, portfolio))
}

async fn simulate_handler(body: Bytes) -> Result<Response> {
    let payload: SimulatePayload = parse_body(&body)?;
    let result = run_pipeline(
        &payload.baseline.into_snapshot(),
        &payload.founder,
        &payload.stress,
    );
    Ok(json_response(StatusCode::OK, result))
}

async fn survival_handler(body: Bytes) -> Result<Response> {
    let payload: SurvivalPayload = parse_body(&body)?;
    let survival_score = calculate_survival_score(
        payload.runway_months,
        payload.growth_percent,
        payload.burn,
        payload.revenue,
    );
    Ok(json_response(StatusCode::OK, SurvivalResponse { survival_score }))
}

async fn founder_handler(body: Bytes) -> Result<Response> {
    let payload: FounderPayload = parse_body(&body)?;
    let adjusted = apply_founder_controls(&payload.baseline.into_snapshot(), &payload.controls);
    Ok(json_response(StatusCode::OK, adjusted))
}

async fn stress_handler(body: Bytes) -> Result<Response> {
    let payload: StressPayload = parse_body(&body)?;
    let adjusted = calculate_stress_test(&payload.baseline.into_snapshot(), &payload.controls);
    Ok(json_response(
        StatusCode::OK,
        StressResponse {
            adjusted,
            is_stressed: payload.controls.is_active(),
        },
    ))
}

async fn fundability_handler(body: Bytes) -> Result<Response> {
    let input: FundabilityInput = parse_body(&body)?;
    let score = calculate_fundability(&input);
    Ok(json_response(
        StatusCode::OK,
        FundabilityResponse {
            score,
            rating: fundability_rating(score),
        },
    ))
}

async fn health_score_handler(body: Bytes) -> Result<Response> {
    let inputs: HealthInputs = parse_body(&body)?;
    Ok(json_response(StatusCode::OK, calculate_health_score(&inputs)))
}

async fn scenario_handler(body: Bytes) -> Result<Response> {
    let payload: ScenarioPayload = parse_body(&body)?;
    let result = run_scenario_simulation(
        payload.kind,
        payload.capital,
        payload.monthly_contribution,
        payload.risk_profile,
    );
    Ok(json_response(StatusCode::OK, result))
}

async fn portfolio_stress_handler(body: Bytes) -> Result<Response> {
    let payload: PortfolioStressPayload = parse_body(&body)?;
    let results = run_stress_tests(payload.current_value, &payload.allocation);
    Ok(json_response(StatusCode::OK, PortfolioStressResponse { results }))
}

async fn list_investments_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.store.investments().await)
}

async fn add_investment_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let new: NewInvestment = parse_body(&body)?;
    if new.startup_name.trim().is_empty() {
        return Err(ApiError::BadRequest("startupName is required".to_string()));
    }
    let item = state.store.add_investment(new).await?;
    Ok(json_response(StatusCode::CREATED, item))
}

async fn remove_investment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.store.remove_investment(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn generated_portfolio_handler(State(state): State<AppState>) -> Result<Response> {
    let portfolio = state
        .store
        .generated_portfolio()
        .await
        .ok_or_else(|| ApiError::NotFound("No generated portfolio".to_string()))?;
    Ok(json_response(StatusCode::OK, portfolio))
}

async fn clear_generated_portfolio_handler(State(state): State<AppState>) -> Result<Response> {
    state.store.clear_generated_portfolio().await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.store.scenarios().await)
}

async fn add_scenario_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let new: NewScenario = parse_body(&body)?;
    let scenario = state.store.add_scenario(new).await?;
    Ok(json_response(StatusCode::CREATED, scenario))
}

async fn remove_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.store.remove_scenario(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn compare_scenarios_handler(State(state): State<AppState>) -> Result<Response> {
    let scenarios = state.store.compare_scenarios().await?;
    Ok(json_response(StatusCode::OK, scenarios))
}

async fn dashboard_health_handler(State(state): State<AppState>) -> Response {
    let inputs = state.store.dashboard_health_inputs().await;
    json_response(StatusCode::OK, calculate_health_score(&inputs))
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    // An absent body reads as an empty object so defaulted payloads still work.
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid API JSON payload: {e}")))
}

fn parse_body_or_default<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    parse_body(body).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "unreadable request body; using defaults");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn offline_state() -> AppState {
        AppState::new(Advisor::offline(), Store::in_memory())
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.unwrap_or_default().to_string()))
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Some(body)).await
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let app = router(offline_state());
        let (status, json) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let app = router(offline_state());
        let (status, json) = send(&app, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn responses_are_not_cached() {
        let app = router(offline_state());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn generate_answers_fallback_even_for_malformed_body() {
        let app = router(offline_state());
        let (status, json) = post_json(&app, "/api/generate", "{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["provider"], "fallback");
        assert_eq!(json["error"], "No idea provided");
        assert_eq!(json["cash"], 480_000.0);

        let (status, json) = post_json(&app, "/api/generate", r#"{"idea":"drone deliveries"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["runway"], 12);
        assert_eq!(json["survivalScore"], 60);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn advice_answers_template_with_request_metrics() {
        let app = router(offline_state());
        let (status, json) = post_json(
            &app,
            "/api/advice",
            r#"{"idea":"x","runway":6,"burn":50000,"revenue":20000,"growth":4,"team":3,"survivalScore":40,"scenario":{"recession":true}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["provider"], "fallback");
        assert!(
            json["assessment"]
                .as_str()
                .unwrap_or_default()
                .contains("critical")
        );
        assert!(
            json["investorMemo"]
                .as_str()
                .unwrap_or_default()
                .contains("$20K MRR")
        );
    }

    #[tokio::test]
    async fn thesis_requires_startup_data() {
        let app = router(offline_state());
        let (status, json) = post_json(&app, "/api/investment-thesis", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Startup data is required");

        let (status, json) = post_json(
            &app,
            "/api/investment-thesis",
            r#"{"startupData":{"runwayMonths":14,"monthlyBurn":40000,"survivalScore":70}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valuation"], 2_000_000.0);
        assert_eq!(json["comparable"], serde_json::json!(["Unknown"]));
    }

    #[tokio::test]
    async fn agents_require_scenario_and_answer_in_order() {
        let app = router(offline_state());
        let (status, _) = post_json(&app, "/api/agents", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            post_json(&app, "/api/agents", r#"{"scenario":"Quit my job to build a SaaS"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let analyses = json["analyses"].as_array().expect("analyses");
        let ids: Vec<_> = analyses
            .iter()
            .map(|a| a["agentId"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["cfo", "vc", "wealth", "risk", "trader"]);
        assert_eq!(analyses[3]["riskLevel"], 10.0);
    }

    #[tokio::test]
    async fn debate_runs_two_rounds_and_a_consensus() {
        let app = router(offline_state());
        let (status, json) = post_json(&app, "/api/agents/debate", r#"{"scenario":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Scenario is required");

        let (status, json) =
            post_json(&app, "/api/agents/debate", r#"{"scenario":"Sell my flat"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let rounds = json["rounds"].as_array().expect("rounds");
        assert_eq!(rounds.len(), 6);
        assert_eq!(rounds[0]["message"], "I'm analyzing the numbers...");
        assert_eq!(rounds[5]["message"], "That's ridiculous.");
        assert_eq!(rounds[5]["replyingTo"], "CFO");
        assert_eq!(
            json["consensus"],
            "Procedural consensus: Diversify and mitigate risks."
        );
    }

    #[tokio::test]
    async fn finbot_requires_message_and_answers_offline() {
        let app = router(offline_state());
        let (status, _) = post_json(&app, "/api/finbot", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            post_json(&app, "/api/finbot", r#"{"message":"What is a good runway?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["provider"], "fallback");
        assert!(
            json["content"]
                .as_str()
                .unwrap_or_default()
                .starts_with("System Status: Offline Mode.")
        );
    }

    #[tokio::test]
    async fn generated_portfolio_is_saved_and_drives_dashboard() {
        let app = router(offline_state());
        let (status, _) = post_json(&app, "/api/portfolio/generate", r#"{"amount":100000}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = post_json(
            &app,
            "/api/portfolio/generate",
            r#"{"amount":100000,"risk":"Medium","horizon":"5 years","goal":"Growth"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["strategyName"], "Balanced Growth (Fallback)");
        assert_eq!(json["totalAmount"], 100_000.0);

        let (status, saved) = send(&app, Method::GET, "/api/portfolio/generated", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved, json);

        let (_, health) = send(&app, Method::GET, "/api/dashboard/health", None).await;
        // liquidity 14/18, solvency 160k / 72k, growth 100k, stability risk 5
        assert_eq!(health["metrics"]["liquidity"], 78);
        assert_eq!(health["metrics"]["solvency"], 100);
        assert_eq!(health["metrics"]["growth"], 100);
        assert_eq!(health["metrics"]["stability"], 50);
        assert_eq!(health["totalScore"], 81);

        let (status, _) = send(&app, Method::DELETE, "/api/portfolio/generated", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/api/portfolio/generated", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn simulate_runs_founder_then_stress() {
        let app = router(offline_state());
        let (status, json) = post_json(
            &app,
            "/api/simulate",
            r#"{"baseline":{"revenue":25000,"burn":40000,"growth":8,"team":5,"cash":480000},
                "founder":{"plannedHires":2,"marketingBudget":20000},
                "stress":{"recession":true}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["founderAdjusted"]["burn"], 78_000.0);
        assert_eq!(json["founderAdjusted"]["growth"], 9.0);
        assert_eq!(json["founderAdjusted"]["runway"], 6);
        assert_eq!(json["founderAdjusted"]["survivalScore"], 40);
        assert_eq!(json["stressed"]["adjustedBurn"], 89_700.0);
        assert_eq!(json["isStressed"], true);
        assert_eq!(json["isFounderModified"], true);
        assert!(json["rating"].is_string());
    }

    #[tokio::test]
    async fn engine_endpoints_answer_and_validate() {
        let app = router(offline_state());

        let (status, json) = post_json(
            &app,
            "/api/survival",
            r#"{"runwayMonths":20,"growthPercent":12,"burn":10000,"revenue":20000}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["survivalScore"], 90);

        let (status, json) = post_json(
            &app,
            "/api/fundability",
            r#"{"runwayMonths":18,"monthlyBurn":20000,"survivalScore":95}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"], 98);
        assert_eq!(json["rating"], "A+ (VC Ready)");

        let (status, json) = post_json(&app, "/api/health-score", "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["grade"], "F");

        let (status, _) = post_json(&app, "/api/survival", r#"{"runwayMonths":"soon"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stress_walks_down_from_carried_score() {
        let app = router(offline_state());
        let (status, json) = post_json(
            &app,
            "/api/stress",
            r#"{"baseline":{"revenue":25000,"burn":40000,"growth":8,"cash":480000,"survivalScore":60},
                "controls":{"recession":true,"adCostIncrease":10,"hiringIncrease":1}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // 40000 * 1.15 * 1.1 + 8000 = 58600
        assert_eq!(json["adjustedBurn"], 58_600.0);
        assert_eq!(json["adjustedRunway"], 8);
        // 60 - 15 (recession) - 15 (runway < 10) - 10 (burn > 2x revenue)
        assert_eq!(json["adjustedSurvivalScore"], 20);
        assert_eq!(json["isStressed"], true);
    }

    #[tokio::test]
    async fn scenario_and_portfolio_stress_endpoints() {
        let app = router(offline_state());
        let (status, json) = post_json(
            &app,
            "/api/scenario",
            r#"{"type":"invest","capital":10000,"monthlyContribution":0,"riskProfile":"low"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["riskScore"], 2);
        assert_eq!(json["projections"].as_array().map(Vec::len), Some(5));

        let (status, json) = post_json(
            &app,
            "/api/portfolio/stress",
            r#"{"currentValue":10000,"allocation":[{"symbol":"VTI","percentage":100,"type":"ETF"}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = json["results"].as_array().expect("results");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["scenario"], "Global Recession");
        assert_approx(results[0]["projectedValue"].as_f64().unwrap_or_default(), 7_000.0);
    }

    #[tokio::test]
    async fn investments_crud() {
        let app = router(offline_state());
        let (status, item) = post_json(
            &app,
            "/api/portfolio/investments",
            r#"{"startupName":"Nimbus Labs","askAmount":500000,"valuation":2000000,"fundabilityScore":72}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["ticker"], "NIMB");
        assert_eq!(item["shares"], 1000);
        assert_eq!(item["costBasis"], 500_000.0);

        let (_, list) = send(&app, Method::GET, "/api/portfolio/investments", None).await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));

        let id = item["id"].as_str().expect("id");
        let uri = format!("/api/portfolio/investments/{id}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, json) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());

        let (status, _) = post_json(&app, "/api/portfolio/investments", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scenarios_add_compare_remove() {
        let app = router(offline_state());
        let (status, created) = post_json(
            &app,
            "/api/scenarios",
            r#"{"name":"Garage","type":"startup","inputs":{"capital":20000,"monthlyContribution":0,"riskProfile":"high"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["aiAnalysis"], "Select 'Compare' to analyze.");
        assert_eq!(created["result"]["riskScore"], 9);

        let (status, compared) = post_json(&app, "/api/scenarios/compare", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            compared[0]["aiAnalysis"],
            "High risk, potentially high reward. Success depends on execution."
        );

        let id = created["id"].as_str().expect("id");
        let (status, _) = send(&app, Method::DELETE, &format!("/api/scenarios/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, list) = send(&app, Method::GET, "/api/scenarios", None).await;
        assert_eq!(list, serde_json::json!([]));

        let (status, _) = post_json(&app, "/api/scenarios", r#"{"name":"bad"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_without_data_uses_demo_profile() {
        let app = router(offline_state());
        let (status, json) = send(&app, Method::GET, "/api/dashboard/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalScore"], 87);
        assert_eq!(json["grade"], "A");
    }
}
