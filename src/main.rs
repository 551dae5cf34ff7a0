use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rmd_agent::{AgentConfig, FallbackAssessor, HttpLlmClient, LlmAssessor};
use rmd_core::tools::TOOL_NAMES;
use rmd_explain::XAIExplanation;
use rmd_fhir::{Bundle, screening_bundle};
use rmd_store::{AssessmentStore, StoredAssessment, new_assessment_id};
use rmd_types::{PatientScreening, RiskAssessment};

/// Application state shared across REST API handlers.
///
/// Holds the assessment pipeline (LLM-backed when configured, otherwise
/// rule-based), the file-backed assessment store, and the analysis tool
/// names recorded in each explanation's reasoning trace.
#[derive(Clone)]
struct AppState {
    assessor: Arc<FallbackAssessor>,
    store: AssessmentStore,
    tools: Arc<Vec<String>>,
}

/// Response for one completed screening assessment: the identifier it
/// was stored under, the clinical assessment, the explanation package,
/// and the FHIR bundle for the encounter.
#[derive(serde::Serialize)]
struct AssessRes {
    assessment_id: String,
    assessment: RiskAssessment,
    explanation: XAIExplanation,
    fhir_bundle: Bundle,
}

/// Main entry point for the RMD screening service.
///
/// Starts the REST server on port 3000 (configurable via RMD_ADDR).
/// When an LLM API key is configured the assessment pipeline calls the
/// model with the rule-based assessor as fallback; without a key the
/// service runs rule-based only.
///
/// # Environment Variables
/// - `RMD_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RMD_DATA_DIR`: Directory for assessment storage (default: "assessment_data")
/// - `RMD_API_BASE_URL`, `RMD_MODEL`, `RMD_API_KEY`, `RMD_LLM_TIMEOUT_SECS`:
///   LLM client configuration (see `rmd_agent::AgentConfig`)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rmd=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RMD_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("RMD_DATA_DIR").unwrap_or_else(|_| "assessment_data".into());

    let config = AgentConfig::from_env();
    let (assessor, tools) = if config.is_configured() {
        tracing::info!("++ LLM assessment enabled (model: {})", config.model);
        let client = HttpLlmClient::new(&config)?;
        (
            FallbackAssessor::new(Box::new(LlmAssessor::new(client))),
            TOOL_NAMES.iter().map(|name| name.to_string()).collect(),
        )
    } else {
        tracing::info!("++ No LLM API key configured, running rule-based only");
        (FallbackAssessor::rule_based_only(), Vec::new())
    };

    let state = AppState {
        assessor: Arc::new(assessor),
        store: AssessmentStore::open(&data_dir)?,
        tools: Arc::new(tools),
    };

    tracing::info!("++ Starting RMD screening REST on {}", addr);

    let app = Router::new()
        .route("/health", get(health))
        .route("/assess", post(assess))
        .route("/history/:patient_ref", get(history))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint for monitoring and load balancers.
async fn health(State(_state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "SERVING", "service": "rmd-screening" }))
}

/// Run the full screening pipeline for one patient submission.
///
/// Validates the screening, produces the assessment (LLM with rule-based
/// fallback, or rule-based only), renders the explanation package, builds
/// the FHIR bundle, and persists the record before responding.
///
/// # Returns
/// * `Ok(Json<AssessRes>)` - Completed assessment with explanation and bundle
/// * `Err((StatusCode, String))` - Validation failure or internal error
async fn assess(
    State(state): State<AppState>,
    Json(patient): Json<PatientScreening>,
) -> Result<Json<AssessRes>, (StatusCode, String)> {
    patient
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // The assessor may block on an HTTP call to the model.
    let result = tokio::task::spawn_blocking(move || run_pipeline(&state, &patient))
        .await
        .map_err(|e| {
            tracing::error!("Assessment task panicked: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
        })?;

    match result {
        Ok(res) => Ok(Json(res)),
        Err(e) => {
            tracing::error!("Assessment pipeline error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ))
        }
    }
}

fn run_pipeline(state: &AppState, patient: &PatientScreening) -> anyhow::Result<AssessRes> {
    let assessment = state.assessor.assess(patient);
    let assessment_id = new_assessment_id();

    let explanation = rmd_explain::render(
        &assessment_id,
        patient,
        assessment.risk_level,
        assessment.confidence_score,
        &assessment.likely_conditions,
        &assessment.recommended_next_step,
        &assessment.red_flags_identified,
        &state.tools,
    )?;

    let fhir_bundle = screening_bundle(patient, &assessment)?;

    state
        .store
        .save(&patient.patient_id, &assessment_id, &assessment, &explanation)?;

    tracing::info!(
        %assessment_id,
        risk_level = %assessment.risk_level,
        "Assessment stored"
    );

    Ok(AssessRes {
        assessment_id,
        assessment,
        explanation,
        fhir_bundle,
    })
}

/// List every stored assessment for a patient, oldest first.
///
/// # Returns
/// * `Ok(Json<Vec<StoredAssessment>>)` - The patient's assessment history
/// * `Err((StatusCode, &str))` - Internal server error if loading fails
async fn history(
    State(state): State<AppState>,
    Path(patient_ref): Path<String>,
) -> Result<Json<Vec<StoredAssessment>>, (StatusCode, &'static str)> {
    let records = tokio::task::spawn_blocking(move || state.store.load_history(&patient_ref))
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))?;

    match records {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("History load error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}
