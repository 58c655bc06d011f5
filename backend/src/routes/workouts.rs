//! Workout ledger routes
//!
//! All endpoints are scoped to the authenticated user.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppQuery};
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitness_trainer_shared::types::{
    LogWorkoutRequest, LogWorkoutResponse, MessageResponse, StatsResponse, WorkoutDetailResponse,
    WorkoutHistoryQuery, WorkoutHistoryResponse,
};
use uuid::Uuid;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/log", post(log_workout))
        .route("/history", get(history))
        .route("/stats", get(stats))
        .route("/:id", get(get_workout).delete(delete_workout))
}

/// POST /api/v1/workouts/log
async fn log_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<LogWorkoutRequest>,
) -> ApiResult<(StatusCode, Json<LogWorkoutResponse>)> {
    let response = WorkoutService::log_workout(&state, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/workouts/history?page=&limit=
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<WorkoutHistoryQuery>,
) -> ApiResult<Json<WorkoutHistoryResponse>> {
    Ok(Json(WorkoutService::history(state.db(), auth.user_id, &query).await?))
}

/// GET /api/v1/workouts/stats
async fn stats(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(WorkoutService::stats(&state, auth.user_id).await?))
}

async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkoutDetailResponse>> {
    let id = parse_workout_id(&id)?;
    Ok(Json(WorkoutService::get(state.db(), auth.user_id, id).await?))
}

async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_workout_id(&id)?;
    Ok(Json(WorkoutService::delete(state.db(), auth.user_id, id).await?))
}

/// An id that cannot name a workout is reported like a missing one
fn parse_workout_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Workout not found".to_string()))
}
