//! Account routes: register, login, refresh
//!
//! Password hashing runs on the blocking pool inside [`UserService`].

use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use fitness_trainer_shared::types::{AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthTokens>)> {
    let tokens = UserService::register(state.db(), state.jwt(), &req).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    Ok(Json(UserService::login(state.db(), state.jwt(), &req).await?))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    Ok(Json(
        UserService::refresh_token(state.db(), state.jwt(), &req.refresh_token).await?,
    ))
}
