// Main entry point for the society report service

mod config;
mod mailer;
mod pipeline;
mod scheduler;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report::ai::OpenAiAnswerer;
use report::GithubStore;

use config::Config;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,report=debug,reporter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pharma Society Report service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        societies = config.societies.len(),
        policy = ?config.merge_policy,
        "Configuration loaded"
    );

    let service = Arc::new(
        OpenAiAnswerer::new(&config.openai_api_key)
            .context("Failed to build OpenAI client")?
            .with_model(&config.openai_model),
    );
    let store = Arc::new(
        GithubStore::new(&config.github_token, &config.github_repo, &config.report_path)
            .context("Failed to build GitHub store")?,
    );

    let schedule = config.schedule.clone();
    let pipeline = Arc::new(Pipeline::new(service, store, config));

    // Manual trigger: run the pipeline once and exit.
    if std::env::args().any(|arg| arg == "--once") {
        tracing::info!("Running single report pass (--once)");
        return pipeline.run().await;
    }

    let _scheduler = scheduler::start_scheduler(pipeline, &schedule)
        .await
        .context("Failed to start scheduler")?;

    tracing::info!("Waiting for scheduled report runs (Ctrl-C to stop)");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");

    Ok(())
}
