mod app;
mod auth;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::auth::AuthConfig;
use crate::external::quote_provider::QuoteProvider;
use crate::external::yahoo::YahooProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let provider_name =
        std::env::var("QUOTE_PROVIDER").unwrap_or_else(|_| "yahoo".to_string());
    let provider: Arc<dyn QuoteProvider> = match provider_name.to_lowercase().as_str() {
        "yahoo" => {
            tracing::info!("📊 Using quote provider: Yahoo Finance");
            Arc::new(YahooProvider::new())
        }
        other => {
            return Err(format!("Invalid QUOTE_PROVIDER: {} (expected 'yahoo')", other).into());
        }
    };

    let state = AppState {
        pool,
        quote_provider: provider,
        http_client: reqwest::Client::new(),
        auth: AuthConfig::from_env(),
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 SmartFolio backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
