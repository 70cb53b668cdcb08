use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Credentials, TokenResponse, User};
use crate::services::user_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<User>), AppError> {
    info!("POST /auth/register - Registering '{}'", input.username);
    let user = user_service::register(&state.pool, &input.username, &input.password)
        .await
        .map_err(|e| {
            error!("Registration failed for '{}': {}", input.username, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    info!("POST /auth/login - Login attempt for '{}'", input.username);
    let token = user_service::login(&state.pool, &state.auth, &input.username, &input.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}
