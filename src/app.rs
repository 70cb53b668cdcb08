use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{auth, health, portfolio, screener};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/screener", screener::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
