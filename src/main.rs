use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use pakar_core::{InferenceEngine, KnowledgeBase, config};

/// Application state shared across REST API handlers
///
/// Holds the inference engine, which in turn holds the shared read-only
/// knowledge base loaded at startup.
#[derive(Clone)]
struct AppState {
    engine: InferenceEngine,
}

#[derive(Serialize, ToSchema)]
struct HealthRes {
    status: String,
    symptoms: usize,
    rules: usize,
}

#[derive(Serialize, ToSchema)]
struct SymptomRes {
    code: String,
    description: String,
}

#[derive(Serialize, ToSchema)]
struct ListSymptomsRes {
    symptoms: Vec<SymptomRes>,
}

#[derive(Serialize, ToSchema)]
struct RuleRes {
    code: String,
    conditions: Vec<String>,
    diagnosis: String,
    solution: String,
}

#[derive(Serialize, ToSchema)]
struct ListRulesRes {
    rules: Vec<RuleRes>,
}

#[derive(Deserialize, ToSchema)]
struct DiagnoseReq {
    /// Observed symptom codes, e.g. ["G01", "G02"]
    symptoms: Vec<String>,
}

#[derive(Serialize, ToSchema)]
struct MatchRes {
    code: String,
    diagnosis: String,
    solution: String,
    matched_conditions: Vec<String>,
}

#[derive(Serialize, ToSchema)]
struct DiagnoseRes {
    matches: Vec<MatchRes>,
}

#[derive(Serialize, ToSchema)]
struct PartialMatchRes {
    code: String,
    diagnosis: String,
    matched: usize,
    total: usize,
    complete: bool,
}

#[derive(Serialize, ToSchema)]
struct DiagnosePartialRes {
    matches: Vec<PartialMatchRes>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_symptoms, list_rules, diagnose, diagnose_partial),
    components(schemas(
        HealthRes,
        ListSymptomsRes,
        SymptomRes,
        ListRulesRes,
        RuleRes,
        DiagnoseReq,
        DiagnoseRes,
        MatchRes,
        DiagnosePartialRes,
        PartialMatchRes
    ))
)]
struct ApiDoc;

/// Main entry point for the pakar diagnosis service
///
/// Loads the knowledge base once at startup and serves the REST API over it.
/// The catalog is immutable for the lifetime of the process; restart the
/// service to pick up a new knowledge base.
///
/// # Environment Variables
/// - `PAKAR_KB_PATH`: Knowledge-base JSON path (default: the shipped `data/knowledge_base.json`)
/// - `PAKAR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If the knowledge base fails to load or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pakar_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let kb_path = std::env::var("PAKAR_KB_PATH").ok().map(PathBuf::from);
    let rest_addr = std::env::var("PAKAR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let path = config::resolve_knowledge_base_path(kb_path)?;
    let knowledge = Arc::new(KnowledgeBase::load(&path)?);

    tracing::info!(
        "++ Loaded knowledge base from {} ({} symptoms, {} rules)",
        path.display(),
        knowledge.symptoms().len(),
        knowledge.rules().len()
    );
    tracing::info!("++ Starting pakar REST on {}", rest_addr);

    let app = Router::new()
        .route("/health", get(health))
        .route("/symptoms", get(list_symptoms))
        .route("/rules", get(list_rules))
        .route("/diagnose", post(diagnose))
        .route("/diagnose/partial", post(diagnose_partial))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            engine: InferenceEngine::new(knowledge),
        });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports the loaded catalog sizes alongside the service status, so
/// monitoring can tell an empty catalog from a healthy one.
///
/// # Returns
/// * `Json<HealthRes>` - Service status and catalog sizes
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let knowledge = state.engine.knowledge();
    Json(HealthRes {
        status: "ok".to_string(),
        symptoms: knowledge.symptoms().len(),
        rules: knowledge.rules().len(),
    })
}

#[utoipa::path(
    get,
    path = "/symptoms",
    responses(
        (status = 200, description = "The symptom catalog in presentation order", body = ListSymptomsRes)
    )
)]
/// List the symptom catalog
///
/// Clients drive their question flow from this list; the order is the
/// presentation order authored in the knowledge base.
async fn list_symptoms(State(state): State<AppState>) -> Json<ListSymptomsRes> {
    let symptoms = state
        .engine
        .knowledge()
        .symptoms()
        .iter()
        .map(|symptom| SymptomRes {
            code: symptom.code.to_string(),
            description: symptom.description.clone(),
        })
        .collect();
    Json(ListSymptomsRes { symptoms })
}

#[utoipa::path(
    get,
    path = "/rules",
    responses(
        (status = 200, description = "The rule catalog in evaluation order", body = ListRulesRes)
    )
)]
/// List the rule catalog
async fn list_rules(State(state): State<AppState>) -> Json<ListRulesRes> {
    let rules = state
        .engine
        .knowledge()
        .rules()
        .iter()
        .map(|rule| RuleRes {
            code: rule.code.to_string(),
            conditions: rule.conditions.iter().map(|c| c.to_string()).collect(),
            diagnosis: rule.diagnosis.clone(),
            solution: rule.solution.clone(),
        })
        .collect();
    Json(ListRulesRes { rules })
}

#[utoipa::path(
    post,
    path = "/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Rules whose conditions are all observed", body = DiagnoseRes),
        (status = 400, description = "Bad request")
    )
)]
/// Diagnose from observed symptom codes
///
/// Returns every rule whose full condition set is contained in the observed
/// codes, in catalog order. An empty `matches` list means no rule fired;
/// that is a normal outcome, not an error.
async fn diagnose(
    State(state): State<AppState>,
    Json(req): Json<DiagnoseReq>,
) -> Json<DiagnoseRes> {
    let matches = state
        .engine
        .diagnose(&req.symptoms)
        .into_iter()
        .map(|item| MatchRes {
            code: item.code.to_string(),
            diagnosis: item.diagnosis,
            solution: item.solution,
            matched_conditions: item
                .matched_conditions
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
        })
        .collect();
    Json(DiagnoseRes { matches })
}

#[utoipa::path(
    post,
    path = "/diagnose/partial",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Condition overlap per rule", body = DiagnosePartialRes),
        (status = 400, description = "Bad request")
    )
)]
/// Report how close each rule came to firing
///
/// Lists every rule sharing at least one condition with the observed codes,
/// with distinct matched/total counts and a completeness flag. Clients use
/// this to suggest near-misses when `/diagnose` returns nothing.
async fn diagnose_partial(
    State(state): State<AppState>,
    Json(req): Json<DiagnoseReq>,
) -> Json<DiagnosePartialRes> {
    let matches = state
        .engine
        .match_partial(&req.symptoms)
        .into_iter()
        .map(|item| PartialMatchRes {
            code: item.code.to_string(),
            diagnosis: item.diagnosis,
            matched: item.matched,
            total: item.total,
            complete: item.complete,
        })
        .collect();
    Json(DiagnosePartialRes { matches })
}
