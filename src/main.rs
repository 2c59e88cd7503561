mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod ownership;
mod questions;
mod saved_answers;
mod state;
mod study;

#[cfg(test)]
mod memory;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "bible_qa=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let db = db::connect(&config).await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState::init(config, db)?;
    app::serve(app::build_app(state)).await
}
