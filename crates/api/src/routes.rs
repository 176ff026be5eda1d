use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use knockout_db::TournamentStore;
use knockout_models::{BracketView, Match, Team, TeamStats, TopScorer, TournamentState};
use knockout_services::TournamentService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;

pub struct AppState<S> {
    pub tournament: Arc<TournamentService<S>>,
    pub started_at: Instant,
}

impl<S> AppState<S> {
    pub fn new(tournament: Arc<TournamentService<S>>) -> Self {
        Self {
            tournament,
            started_at: Instant::now(),
        }
    }
}

// Derived Clone would demand S: Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tournament: Arc::clone(&self.tournament),
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    /// Readable failure message.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Stable failure label, e.g. `already_started`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            kind: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(flatten)]
    pub state: TournamentState,
    pub teams_registered: usize,
    pub matches_total: usize,
    pub matches_completed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamCount {
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ScorerParams {
    pub limit: Option<usize>,
}

pub fn create_routes<S: TournamentStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health and monitoring
        .route("/health", get(health_check::<S>))
        .route("/metrics", get(metrics::<S>))

        // Teams
        .route("/api/teams", get(list_teams::<S>).post(register_team::<S>))
        .route("/api/teams/count", get(count_teams::<S>))
        .route("/api/teams/:country/stats", get(team_stats::<S>))

        // Matches
        .route("/api/matches", get(list_matches::<S>))
        .route("/api/matches/:code", get(get_match::<S>))
        .route("/api/bracket", get(bracket::<S>))
        .route("/api/match/simulate", post(simulate_match::<S>))
        .route("/api/top-scorers", get(top_scorers::<S>))

        // Tournament lifecycle
        .route("/api/tournament/status", get(tournament_status::<S>))
        .route("/api/tournament/start", post(start_tournament::<S>))
        .route("/api/tournament/reset", post(reset_tournament::<S>))
}

/// Router with state, request tracing and permissive CORS for the browser client.
pub fn app<S: TournamentStore + 'static>(tournament: Arc<TournamentService<S>>) -> Router {
    create_routes::<S>()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(tournament))
}

async fn health_check<S: TournamentStore + 'static>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

async fn metrics<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .tournament
        .metrics()
        .render()
        .map_err(|e| ApiError::Internal(format!("metrics encoding failed: {e}")))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

async fn list_teams<S: TournamentStore + 'static>(State(state): State<AppState<S>>) -> ApiResult<Vec<Team>> {
    let teams = state.tournament.list_teams().await?;
    Ok(Json(ApiResponse::ok(teams)))
}

async fn register_team<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
    Json(team): Json<Team>,
) -> Result<(StatusCode, Json<ApiResponse<Team>>), ApiError> {
    let team = state.tournament.register_team(team).await?;
    let message = format!("{} registered", team.country);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(team).with_message(message))))
}

async fn count_teams<S: TournamentStore + 'static>(State(state): State<AppState<S>>) -> ApiResult<TeamCount> {
    let count = state.tournament.count_teams().await?;
    Ok(Json(ApiResponse::ok(TeamCount { count })))
}

async fn team_stats<S: TournamentStore + 'static>(
    Path(country): Path<String>,
    State(state): State<AppState<S>>,
) -> ApiResult<TeamStats> {
    let stats = state.tournament.team_stats(&country).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

async fn list_matches<S: TournamentStore + 'static>(State(state): State<AppState<S>>) -> ApiResult<Vec<Match>> {
    let matches = state.tournament.list_matches().await?;
    Ok(Json(ApiResponse::ok(matches)))
}

async fn get_match<S: TournamentStore + 'static>(
    Path(code): Path<String>,
    State(state): State<AppState<S>>,
) -> ApiResult<Match> {
    let fixture = state.tournament.get_match(&code).await?;
    Ok(Json(ApiResponse::ok(fixture)))
}

async fn bracket<S: TournamentStore + 'static>(State(state): State<AppState<S>>) -> ApiResult<BracketView> {
    let bracket = state.tournament.bracket().await?;
    Ok(Json(ApiResponse::ok(bracket)))
}

async fn simulate_match<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<SimulateRequest>,
) -> ApiResult<Match> {
    let resolved = state.tournament.resolve_match(&request.match_id).await?;
    let message = resolved
        .winner()
        .map(|w| format!("{} advances", w.team.country))
        .unwrap_or_else(|| "Match resolved".to_string());
    Ok(Json(ApiResponse::ok(resolved).with_message(message)))
}

async fn top_scorers<S: TournamentStore + 'static>(
    Query(params): Query<ScorerParams>,
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<TopScorer>> {
    let scorers = state.tournament.top_scorers(params.limit).await?;
    Ok(Json(ApiResponse::ok(scorers)))
}

async fn tournament_status<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<StatusResponse> {
    let tournament = &state.tournament;
    let status = tournament.status().await?;
    let teams_registered = tournament.count_teams().await?;
    let bracket = tournament.bracket().await?;
    let matches_total =
        bracket.quarter_finals.len() + bracket.semi_finals.len() + usize::from(bracket.final_match.is_some());

    Ok(Json(ApiResponse::ok(StatusResponse {
        state: status,
        teams_registered,
        matches_total,
        matches_completed: bracket.completed_count(),
    })))
}

async fn start_tournament<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Match>>>), ApiError> {
    let matches = state.tournament.start_tournament().await?;
    info!("🌐 Bracket drawn via API");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(matches).with_message("Tournament started")),
    ))
}

async fn reset_tournament<S: TournamentStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<ResetResponse> {
    let removed = state.tournament.reset_tournament().await?;
    Ok(Json(ApiResponse::ok(ResetResponse { removed }).with_message("Tournament reset")))
}
