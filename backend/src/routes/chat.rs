//! Trainer chat routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{AppJson, AppQuery};
use crate::services::ChatService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use fitness_trainer_shared::types::{
    ChatHistoryQuery, ChatHistoryResponse, ChatReplyResponse, ClearHistoryResponse,
    ExerciseRecommendationRequest, ExerciseRecommendationResponse, SendMessageRequest,
    WorkoutPlanResponse,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/message", post(send_message))
        .route("/history", get(history).delete(clear_history))
        .route("/workout-plan", post(workout_plan))
        .route("/exercises", post(recommend_exercises))
}

/// POST /api/v1/chat/message
async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<SendMessageRequest>,
) -> ApiResult<Json<ChatReplyResponse>> {
    Ok(Json(ChatService::send_message(&state, auth.user_id, req).await?))
}

/// GET /api/v1/chat/history?limit=
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<ChatHistoryQuery>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    Ok(Json(ChatService::history(state.db(), auth.user_id, &query).await?))
}

/// DELETE /api/v1/chat/history
async fn clear_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ClearHistoryResponse>> {
    Ok(Json(ChatService::clear_history(state.db(), auth.user_id).await?))
}

/// POST /api/v1/chat/workout-plan
async fn workout_plan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<WorkoutPlanResponse>> {
    Ok(Json(ChatService::workout_plan(&state, auth.user_id).await?))
}

/// POST /api/v1/chat/exercises
async fn recommend_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(req): AppJson<ExerciseRecommendationRequest>,
) -> ApiResult<Json<ExerciseRecommendationResponse>> {
    Ok(Json(ChatService::recommend_exercises(state.trainer(), req).await?))
}
