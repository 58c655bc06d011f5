//! Training profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fitness_trainer_shared::types::{ProfileResponse, UpdateProfileRequest};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(ProfileService::get_profile(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(
        ProfileService::update_profile(state.db(), auth.user_id, req).await?,
    ))
}
