use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use onco_core::constants::{
    ADJUVANT_MAX_YEARS_ENV, ADJUVANT_MIN_YEARS_ENV, AS_OF_ENV, DEFAULT_REST_ADDR,
    RECORDS_PATH_ENV, REST_ADDR_ENV,
};
use onco_core::{
    ComplianceSummary, ConfigValues, InMemoryRecordSource, OncologyError, PatientEvaluation,
    PopulationReport, RecordSource, RuleEngine, RuleResult, RuleTally, Severity, SeverityCounts,
    Status, StatusCounts, build_report, resolve_core_config,
};

/// Health check response body.
#[derive(Debug, Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

/// Patient ids in source order.
#[derive(Debug, Serialize, ToSchema)]
struct ListPatientsRes {
    patients: Vec<String>,
}

/// Application state shared across REST API handlers
///
/// One engine and one record source, both immutable, shared behind `Arc`s.
#[derive(Clone)]
struct AppState {
    engine: Arc<RuleEngine>,
    source: Arc<dyn RecordSource>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_patients, evaluate_patient, evaluate_all, report),
    components(schemas(
        HealthRes,
        ListPatientsRes,
        PatientEvaluation,
        ComplianceSummary,
        RuleResult,
        Status,
        Severity,
        StatusCounts,
        SeverityCounts,
        PopulationReport,
        RuleTally
    ))
)]
struct ApiDoc;

/// Main entry point for the oncology compliance service
///
/// Resolves configuration once, loads the record source, and serves the REST API.
///
/// # Environment Variables
/// - `ONCO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ONCO_RECORDS_PATH`: YAML or JSON records file (default: demonstration patients)
/// - `ONCO_AS_OF`: reference date for duration checks (default: today)
/// - `ONCO_ADJUVANT_MIN_YEARS` / `ONCO_ADJUVANT_MAX_YEARS`: adjuvant window (default: 5 / 10)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("onco=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = resolve_core_config(
        ConfigValues {
            records_path: std::env::var(RECORDS_PATH_ENV).ok(),
            as_of: std::env::var(AS_OF_ENV).ok(),
            adjuvant_min_years: std::env::var(ADJUVANT_MIN_YEARS_ENV).ok(),
            adjuvant_max_years: std::env::var(ADJUVANT_MAX_YEARS_ENV).ok(),
        },
        chrono::Local::now().date_naive(),
    )?;
    let source = InMemoryRecordSource::from_optional_path(config.records_path())?;
    let rest_addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    tracing::info!(
        "++ Starting oncology compliance REST on {} ({} patients, as of {})",
        rest_addr,
        source.len(),
        config.as_of()
    );

    let state = AppState {
        engine: Arc::new(RuleEngine::from_config(&config)),
        source: Arc::new(source),
    };

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/:id/evaluation", get(evaluate_patient))
        .route("/evaluations", get(evaluate_all))
        .route("/report", get(report))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn internal_error(context: &str, e: OncologyError) -> (StatusCode, &'static str) {
    tracing::error!("{} error: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Oncology compliance service is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Patient ids in source order", body = ListPatientsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List the ids of every patient in the record source.
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, (StatusCode, &'static str)> {
    let records = state
        .source
        .list_all()
        .map_err(|e| internal_error("List patients", e))?;
    Ok(Json(ListPatientsRes {
        patients: records.into_iter().map(|r| r.id.into_string()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/evaluation",
    params(
        ("id" = String, Path, description = "Patient id (MRN)")
    ),
    responses(
        (status = 200, description = "Rule results and summary", body = PatientEvaluation),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Evaluate one patient against every guideline rule
///
/// Returns the ten rule results in registry order together with the patient summary.
async fn evaluate_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientEvaluation>, (StatusCode, &'static str)> {
    match state.engine.evaluate_patient(state.source.as_ref(), &id) {
        Ok(evaluation) => Ok(Json(evaluation)),
        Err(OncologyError::NotFound(_)) => Err((StatusCode::NOT_FOUND, "Patient not found")),
        Err(e) => Err(internal_error("Evaluate patient", e)),
    }
}

#[utoipa::path(
    get,
    path = "/evaluations",
    responses(
        (status = 200, description = "Evaluation of every patient", body = Vec<PatientEvaluation>),
        (status = 500, description = "Internal server error")
    )
)]
/// Evaluate every patient in the record source, in source order.
async fn evaluate_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientEvaluation>>, (StatusCode, &'static str)> {
    state
        .engine
        .evaluate_source(state.source.as_ref())
        .map(Json)
        .map_err(|e| internal_error("Evaluate all", e))
}

#[utoipa::path(
    get,
    path = "/report",
    responses(
        (status = 200, description = "Population compliance report", body = PopulationReport),
        (status = 500, description = "Internal server error")
    )
)]
/// Population report: overall status counts and per-rule tallies in registry order.
async fn report(
    State(state): State<AppState>,
) -> Result<Json<PopulationReport>, (StatusCode, &'static str)> {
    let evaluations = state
        .engine
        .evaluate_source(state.source.as_ref())
        .map_err(|e| internal_error("Report", e))?;
    Ok(Json(build_report(state.engine.registry(), &evaluations)))
}
