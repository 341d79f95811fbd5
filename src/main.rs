use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use cryptoedu_backend::app;
use cryptoedu_backend::config::AppConfig;
use cryptoedu_backend::external::coingecko::CoinGeckoProvider;
use cryptoedu_backend::logging::{init_logging, LoggingConfig};
use cryptoedu_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logging comes up before anything that might fail.
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let market_data = CoinGeckoProvider::new(&config.coingecko_base_url, config.upstream_timeout)?;
    tracing::info!(
        "Using CoinGecko at {} for {} tracked coins",
        config.coingecko_base_url,
        config.tracked_coins.len()
    );

    let state = AppState {
        pool,
        market_data: Arc::new(market_data),
        tracked_coins: Arc::new(config.tracked_coins.clone()),
    };
    let app = app::create_app(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("CryptoEdu backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
