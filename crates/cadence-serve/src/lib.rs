use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use cadence_copilot::{ChatLog, Exchange};
use cadence_core::member::{parse_member_name, validate_update_text};
use cadence_core::{AnalysisError, Member, Update};
use cadence_extract::{api_key_from_env, ChatConfig, ChatExtractor, FieldExtractor, HeuristicExtractor};
use cadence_stall::StallParams;
use cadence_store::{Store, WorkspaceConfig};

// ── Config ──

pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
}

// ── App State ──

struct AppState {
    root: PathBuf,
    config: WorkspaceConfig,
    extractor: Arc<dyn FieldExtractor>,
    chat: Mutex<ChatLog>,
}

impl AppState {
    fn open_store(&self) -> anyhow::Result<Store> {
        Store::open_path(&self.root)
    }

    fn chat_log(&self) -> anyhow::Result<MutexGuard<'_, ChatLog>> {
        self.chat
            .lock()
            .map_err(|_| anyhow::anyhow!("chat session state poisoned"))
    }
}

/// Chat extractor when a key is configured, heuristic otherwise.
fn default_extractor(config: &WorkspaceConfig) -> Arc<dyn FieldExtractor> {
    match api_key_from_env() {
        Some(api_key) => {
            let chat = ChatConfig {
                api_base: config.extraction.api_base.clone(),
                model: config.extraction.model.clone(),
                timeout_secs: config.extraction.timeout_secs,
                max_retries: config.extraction.max_retries,
                api_key,
            };
            match ChatExtractor::new(chat) {
                Ok(extractor) => Arc::new(extractor),
                Err(e) => {
                    tracing::warn!("chat extractor unavailable ({e}); using heuristic");
                    Arc::new(HeuristicExtractor)
                }
            }
        }
        None => Arc::new(HeuristicExtractor),
    }
}

// ── Error Handling ──

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match self.0.downcast_ref::<AnalysisError>() {
            Some(AnalysisError::InvalidParameter { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_parameter")
            }
            Some(AnalysisError::DataUnavailable { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "data_unavailable")
            }
            None => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = serde_json::json!({ "error": self.0.to_string(), "kind": kind });
        (status, Json(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn invalid(reason: impl Into<String>) -> AppError {
    AppError(AnalysisError::invalid_parameter(reason).into())
}

// ── Entrypoint ──

pub async fn serve(root: &Path, config: ServeConfig) -> anyhow::Result<()> {
    let paths = cadence_store::CadencePaths::discover(root);
    if !paths.is_initialized() {
        anyhow::bail!("not a cadence workspace (run `cadence init` first)");
    }

    let app = router(root);
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("cadence HTTP server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router with the environment-selected extractor.
pub fn router(root: &Path) -> Router {
    let paths = cadence_store::CadencePaths::discover(root);
    let config = WorkspaceConfig::load(&paths);
    let extractor = default_extractor(&config);
    router_with(root, extractor)
}

/// Build the router with a caller-chosen extractor (for testing, or for
/// embedders that bring their own).
pub fn router_with(root: &Path, extractor: Arc<dyn FieldExtractor>) -> Router {
    let paths = cadence_store::CadencePaths::discover(root);
    let config = WorkspaceConfig::load(&paths);
    let features = config.features.clone();
    let state = Arc::new(AppState {
        root: root.to_path_buf(),
        config,
        extractor,
        chat: Mutex::new(ChatLog::default()),
    });

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/stalling", get(get_stalling));

    if features.team_updates {
        app = app
            .route("/api/updates", post(post_update))
            .route("/api/history", get(get_history))
            .route("/api/team-overview", get(get_team_overview));
    }
    if features.analytics {
        app = app
            .route("/api/analytics/trends", get(get_trends))
            .route("/api/analytics/departments", get(get_departments))
            .route("/api/analytics/departments/list", get(get_department_list))
            .route("/api/analytics/velocity", get(get_velocity))
            .route("/api/analytics/overview", get(get_overview))
            .route("/api/performance/ratings", get(get_ratings));
    }
    if features.copilot {
        app = app
            .route("/api/copilot/query", post(post_copilot))
            .route("/api/copilot/history", get(get_copilot_history));
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}

// ── Health ──

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── POST /api/updates ──

#[derive(Deserialize)]
struct SubmitBody {
    /// `"Full Name - Role"`.
    member: String,
    text: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    member: Member,
    update: Update,
}

async fn post_update(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<SubmitResponse>, AppError> {
    let (name, role) = parse_member_name(&body.member).map_err(|e| invalid(e.to_string()))?;
    validate_update_text(&body.text).map_err(|e| invalid(e.to_string()))?;

    let analysis = match state.extractor.extract(&body.text).await {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!("extraction failed ({e}); degrading to heuristic");
            HeuristicExtractor.classify(&body.text)
        }
    };

    let store = state.open_store()?;
    let (member, update) = store.record_update(&name, &role, &body.text, analysis)?;
    Ok(Json(SubmitResponse { member, update }))
}

// ── GET /api/history ──

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct HistoryResponse {
    updates: Vec<Update>,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let store = state.open_store()?;
    let updates = cadence_analytics::update_history(&store, params.limit)?;
    Ok(Json(HistoryResponse { updates }))
}

// ── GET /api/team-overview ──

async fn get_team_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<cadence_analytics::TeamOverview>, AppError> {
    let store = state.open_store()?;
    Ok(Json(cadence_analytics::team_overview(&store)?))
}

// ── GET /api/stalling ──

#[derive(Deserialize)]
struct StallingQuery {
    days: Option<i64>,
    threshold: Option<f64>,
}

async fn get_stalling(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StallingQuery>,
) -> Result<Json<cadence_stall::StallReport>, AppError> {
    let store = state.open_store()?;
    let defaults = &state.config.analysis;
    let stall_params = StallParams {
        days: params.days.unwrap_or(defaults.days),
        threshold: params.threshold.unwrap_or(defaults.threshold),
        max_updates_per_author: defaults.max_updates_per_author,
    };
    Ok(Json(cadence_stall::analyze_stalling(&store, &stall_params)?))
}

// ── GET /api/analytics/trends ──

#[derive(Deserialize)]
struct TrendsQuery {
    range: Option<String>,
    department: Option<String>,
}

#[derive(Serialize)]
struct TrendsResponse {
    trends: Vec<cadence_analytics::TrendBucket>,
}

async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, AppError> {
    let store = state.open_store()?;
    let range = cadence_analytics::TimeRange::parse(params.range.as_deref().unwrap_or("month"))?;
    let trends =
        cadence_analytics::productivity_trends(&store, range, params.department.as_deref())?;
    Ok(Json(TrendsResponse { trends }))
}

// ── GET /api/analytics/departments ──

#[derive(Serialize)]
struct DepartmentsResponse {
    departments: Vec<cadence_analytics::DepartmentMetrics>,
}

async fn get_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DepartmentsResponse>, AppError> {
    let store = state.open_store()?;
    let departments = cadence_analytics::department_metrics(&store)?;
    Ok(Json(DepartmentsResponse { departments }))
}

#[derive(Serialize)]
struct DepartmentListResponse {
    departments: Vec<String>,
}

async fn get_department_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DepartmentListResponse>, AppError> {
    let store = state.open_store()?;
    let departments = cadence_analytics::department_list(&store)?;
    Ok(Json(DepartmentListResponse { departments }))
}

// ── GET /api/analytics/velocity ──

#[derive(Deserialize)]
struct VelocityQuery {
    department: Option<String>,
}

#[derive(Serialize)]
struct VelocityResponse {
    velocity: Vec<cadence_analytics::VelocityBucket>,
}

async fn get_velocity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VelocityQuery>,
) -> Result<Json<VelocityResponse>, AppError> {
    let store = state.open_store()?;
    let velocity = cadence_analytics::team_velocity(&store, params.department.as_deref())?;
    Ok(Json(VelocityResponse { velocity }))
}

// ── GET /api/analytics/overview ──

#[derive(Deserialize)]
struct OverviewQuery {
    period: Option<String>,
}

async fn get_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverviewQuery>,
) -> Result<Json<cadence_analytics::AnalyticsOverview>, AppError> {
    let store = state.open_store()?;
    let period =
        cadence_analytics::OverviewPeriod::parse(params.period.as_deref().unwrap_or("30d"))?;
    Ok(Json(cadence_analytics::analytics_overview(&store, period)?))
}

// ── GET /api/performance/ratings ──

#[derive(Deserialize)]
struct RatingsQuery {
    period: Option<String>,
}

async fn get_ratings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RatingsQuery>,
) -> Result<Json<cadence_analytics::PerformanceReport>, AppError> {
    let store = state.open_store()?;
    let period =
        cadence_analytics::RatingsPeriod::parse(params.period.as_deref().unwrap_or("90d"))?;
    Ok(Json(cadence_analytics::employee_ratings(&store, period)?))
}

// ── POST /api/copilot/query ──

#[derive(Deserialize)]
struct CopilotBody {
    query: String,
    /// Prior `{query, reply}` exchanges from the client's session.
    /// Reseeds the server-side log when it is empty, so a restarted
    /// server picks the conversation back up.
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Deserialize)]
struct ContextEntry {
    query: String,
    reply: String,
}

async fn post_copilot(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CopilotBody>,
) -> Result<Json<cadence_copilot::CopilotReply>, AppError> {
    let store = state.open_store()?;
    let reply = cadence_copilot::answer(&store, &body.query)?;

    let mut chat = state.chat_log()?;
    if chat.is_empty() {
        for entry in body.context {
            chat.push(entry.query, entry.reply);
        }
    }
    chat.push(body.query, reply.message.clone());
    Ok(Json(reply))
}

// ── GET /api/copilot/history ──

async fn get_copilot_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Exchange>>, AppError> {
    let chat = state.chat_log()?;
    Ok(Json(chat.entries().cloned().collect()))
}

// ── Tests ──
