use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::time::interval;

use wellness_bot::config::Config;
use wellness_bot::engine::WellnessEngine;
use wellness_bot::http_server::{start_http_server, AppState};
use wellness_bot::lifecycle::SessionSweeper;
use wellness_bot::rate_limiter::RateLimiter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("🚀 Starting wellness chat server...");
    info!("✅ Configuration loaded");

    let engine = WellnessEngine::new();
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max_requests,
        config.rate_limit_window(),
    ));

    // Background sweep of idle sessions
    let sweeper = SessionSweeper::new(engine.store(), config.idle_threshold(), config.sweep_interval());
    tokio::spawn(async move {
        sweeper.run().await;
    });

    // Forget clients that have gone quiet
    let purge_limiter = limiter.clone();
    let purge_period = config.rate_limit_window();
    tokio::spawn(async move {
        let mut ticker = interval(purge_period);
        loop {
            ticker.tick().await;
            purge_limiter.purge_stale();
        }
    });

    info!("✅ Engine initialized");

    let state = AppState { engine, limiter };
    if let Err(e) = start_http_server(&config, state).await {
        error!("❌ HTTP server failed: {}", e);
        return Err(e);
    }

    Ok(())
}
