use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::external::quote_gateway::QuoteGateway;
use crate::models::{AddLotRequest, MutationOutcome, ValuationReport};
use crate::services::{position_service, valuation_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_report))
        .route("/lots", post(add_lot))
        .route("/tickers/:ticker", delete(remove_ticker))
}

pub async fn get_report(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ValuationReport>, AppError> {
    info!("GET /portfolio - Valuing portfolio for user {}", user.user_id);
    let gateway = QuoteGateway::new(state.quote_provider.clone());
    let report = valuation_service::valuation_report(&state.pool, &gateway, user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to value portfolio for user {}: {}", user.user_id, e);
            e
        })?;
    Ok(Json(report))
}

pub async fn add_lot(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AddLotRequest>,
) -> Result<(StatusCode, Json<MutationOutcome>), AppError> {
    info!(
        "POST /portfolio/lots - Adding lot of '{}' for user {}",
        input.ticker, user.user_id
    );
    let outcome = position_service::add_lot(
        &state.pool,
        user.user_id,
        &input.ticker,
        &input.shares,
        &input.price,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn remove_ticker(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ticker): Path<String>,
) -> Result<Json<MutationOutcome>, AppError> {
    info!(
        "DELETE /portfolio/tickers/{} - Removing ticker for user {}",
        ticker, user.user_id
    );
    let outcome = position_service::remove_ticker(&state.pool, user.user_id, &ticker)
        .await
        .map_err(|e| {
            error!("Failed to remove '{}' for user {}: {}", ticker, user.user_id, e);
            e
        })?;
    Ok(Json(outcome))
}
