//! REST API handlers for Guard Scheduling.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::audit_roster;
use crate::config::ScheduleConfig;
use crate::demo_data::{self, DemoData};
use crate::domain::{Roster, Shift};
use crate::dto::{
    ApplyResponse, AuditQuery, AuditResponse, ErrorResponse, ScheduleJobDto, ScheduleListItemDto,
};
use crate::error::{RosterError, ScheduleError};
use crate::prepare::{prepare_run, ScheduleRequest};
use crate::repository::{apply_schedule, unassign_shift, InMemoryRoster};
use crate::solver::AutoScheduler;

/// Application state shared across handlers.
///
/// Holds the roster and every finished scheduling run by id.
pub struct AppState {
    roster: InMemoryRoster,
    jobs: RwLock<HashMap<String, ScheduleJobDto>>,
    /// Configuration that request patches are merged into.
    defaults: ScheduleConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_roster(Roster::default(), ScheduleConfig::default())
    }

    pub fn with_roster(roster: Roster, defaults: ScheduleConfig) -> Self {
        Self {
            roster: InMemoryRoster::from_roster(roster),
            jobs: RwLock::new(HashMap::new()),
            defaults,
        }
    }

    /// State preloaded with a demo roster, scheduled in the demo year.
    pub fn with_demo(demo: DemoData) -> Self {
        Self::with_roster(
            demo_data::generate(demo),
            ScheduleConfig::for_year(demo_data::DEMO_YEAR),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure of a request, mapped to a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// The roster changed since the result was computed.
    #[error(transparent)]
    Stale(#[from] RosterError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("scheduling task failed: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Schedule(_) => StatusCode::BAD_REQUEST,
            ApiError::Stale(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Roster
        .route("/roster", get(get_roster).put(put_roster))
        .route("/roster/audit", get(audit))
        .route("/roster/shifts/{id}/assignment", delete(unassign))
        // Schedules
        .route("/schedules", post(create_schedule).get(list_schedules))
        .route("/schedules/{id}", get(get_schedule).delete(delete_schedule))
        .route("/schedules/{id}/apply", post(apply))
        .with_state(state)
}

// ============================================================================
// Health & Info
// ============================================================================

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Guard Scheduling",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "Greedy + swap improvement",
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo roster.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<Roster>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// Roster
// ============================================================================

/// GET /roster - Current guards and shifts.
async fn get_roster(State(state): State<Arc<AppState>>) -> Json<Roster> {
    Json(state.roster.snapshot())
}

/// PUT /roster - Replace guards and shifts.
async fn put_roster(
    State(state): State<Arc<AppState>>,
    Json(roster): Json<Roster>,
) -> Json<Roster> {
    info!(
        guards = roster.guards.len(),
        shifts = roster.shifts.len(),
        "Roster replaced"
    );
    state.roster.replace(roster);
    Json(state.roster.snapshot())
}

/// GET /roster/audit - Problems among the roster's current assignments.
async fn audit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditResponse>, ApiError> {
    let roster = state.roster.snapshot();
    let issues = audit_roster(
        &roster.guards,
        &roster.shifts,
        query.min_rest_hours.unwrap_or(state.defaults.min_rest_hours),
        query.reference_year.unwrap_or(state.defaults.reference_year),
    )?;
    Ok(Json(issues.into()))
}

/// DELETE /roster/shifts/{id}/assignment - Clear one shift's assignment.
async fn unassign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Shift>, ApiError> {
    match unassign_shift(&state.roster, &id) {
        Ok(shift) => Ok(Json(shift)),
        Err(RosterError::UnknownShift(id)) => Err(ApiError::NotFound(format!("Shift '{}'", id))),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Schedules
// ============================================================================

/// POST /schedules - Run the auto-scheduler over the roster.
///
/// The result is stored under a new id; the roster is untouched until
/// `POST /schedules/{id}/apply`.
async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleJobDto>, ApiError> {
    let config = state.defaults.merged(&request.config)?;
    let roster = state.roster.snapshot();
    let run = prepare_run(&roster.guards, &roster.shifts, &request.shift_types)?;

    let id = Uuid::new_v4().to_string();
    info!(job_id = %id, shift_types = ?request.shift_types, "Schedule requested");
    #[cfg(feature = "console")]
    crate::console::print_run_started(&id, run.guards.len(), run.shifts.len());

    let started = Instant::now();
    let task_config = config.clone();
    let result = tokio::task::spawn_blocking(move || {
        AutoScheduler::with_config(run.guards, run.shifts, task_config)?.generate_schedule()
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    #[cfg(feature = "console")]
    crate::console::print_run_ended(&result, started.elapsed());
    info!(
        job_id = %id,
        assigned = result.metrics.assigned_shifts,
        unassigned = result.metrics.unassigned_shifts,
        duration_ms = started.elapsed().as_millis() as u64,
        "Schedule stored"
    );

    let job = ScheduleJobDto::new(id.clone(), config, result);
    state.jobs.write().insert(id, job.clone());
    Ok(Json(job))
}

/// GET /schedules - List stored schedules, oldest first.
async fn list_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<ScheduleListItemDto>> {
    let jobs = state.jobs.read();
    let mut items: Vec<ScheduleListItemDto> = jobs.values().map(ScheduleListItemDto::from).collect();
    items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Json(items)
}

/// GET /schedules/{id} - Get a stored schedule.
async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleJobDto>, ApiError> {
    state
        .jobs
        .read()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Schedule '{}'", id)))
}

/// DELETE /schedules/{id} - Forget a stored schedule.
async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.jobs.write().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// POST /schedules/{id}/apply - Write a stored schedule into the roster.
async fn apply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let result = state
        .jobs
        .read()
        .get(&id)
        .map(|job| job.result.clone())
        .ok_or_else(|| ApiError::NotFound(format!("Schedule '{}'", id)))?;

    let applied = apply_schedule(&state.roster, &result)?;
    if let Some(job) = state.jobs.write().get_mut(&id) {
        job.applied = true;
    }
    info!(job_id = %id, applied, "Schedule applied");
    Ok(Json(ApplyResponse::new(applied)))
}
