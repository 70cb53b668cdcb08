use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::quote_gateway::QuoteGateway;
use crate::models::market::{all_markets, MarketListItem};
use crate::models::ScreenerReport;
use crate::services::screener_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_markets))
        .route("/:market", get(screen_market))
}

pub async fn list_markets() -> Json<Vec<MarketListItem>> {
    Json(all_markets().iter().map(MarketListItem::from).collect())
}

pub async fn screen_market(
    State(state): State<AppState>,
    Path(market): Path<String>,
) -> Result<Json<ScreenerReport>, AppError> {
    info!("GET /screener/{} - Running market screener", market);
    let gateway = QuoteGateway::new(state.quote_provider.clone());
    let report = screener_service::run_screener(&gateway, &state.http_client, &market)
        .await
        .map_err(|e| {
            error!("Screener failed for market '{}': {}", market, e);
            e
        })?;
    Ok(Json(report))
}
