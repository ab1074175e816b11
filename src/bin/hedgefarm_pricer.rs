//! HedgeFarm Pricer Server
//!
//! Serves the hedge price REST API.

use anyhow::Context;
use clap::Parser;
use hedgefarm_pricer::api::rest::{AppState, create_router};
use hedgefarm_pricer::application::services::{
    FloorPriceCalculator, PriceQuoteService, RecommendationEngine,
};
use hedgefarm_pricer::config::{AppConfig, SourceKind};
use hedgefarm_pricer::infrastructure::audit::TracingAuditSink;
use hedgefarm_pricer::infrastructure::market_data::{
    CachedQuoteSource, HttpQuoteSource, MarketQuoteSource, StaticQuoteSource,
};
use hedgefarm_pricer::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HedgeFarm Pricer - minimum guaranteed price for hedged harvests
#[derive(Parser, Debug)]
#[command(name = "hedgefarm-pricer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "HEDGEFARM_CONFIG")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn MarketQuoteSource>> {
    let source: Arc<dyn MarketQuoteSource> = match config.market_data.source {
        SourceKind::Static => {
            Arc::new(StaticQuoteSource::demo().context("failed to build demo quotes")?)
        }
        SourceKind::Http => {
            let base_url = config
                .market_data
                .base_url
                .as_deref()
                .context("market_data.base_url is required for the http source")?;
            Arc::new(HttpQuoteSource::new(
                base_url,
                config.calculator.fetch_timeout_ms,
            )?)
        }
    };

    let freshness = config.market_data.cache_freshness_secs;
    if freshness == 0 {
        return Ok(source);
    }
    Ok(Arc::new(CachedQuoteSource::new(source, freshness)))
}

fn build_service(config: &AppConfig) -> anyhow::Result<PriceQuoteService> {
    let calculator = FloorPriceCalculator::from_model_config(
        build_source(config)?,
        &config.pricing,
        config.calculator.clone(),
    );
    let engine = RecommendationEngine::new(config.recommendation.epsilon);
    Ok(PriceQuoteService::new(calculator, engine).with_audit_sink(Arc::new(TracingAuditSink)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.server.log_level = level;
    }

    telemetry::init(&config.server)?;

    tracing::info!("HedgeFarm Pricer v{}", hedgefarm_pricer::VERSION);
    tracing::info!(
        source = ?config.market_data.source,
        cache_freshness_secs = config.market_data.cache_freshness_secs,
        max_volume_tonnes = %config.calculator.max_volume_tonnes,
        max_quote_age_secs = config.calculator.max_quote_age_secs,
        epsilon = %config.recommendation.epsilon,
        "configuration loaded"
    );

    let service = build_service(&config)?;
    let router = create_router(
        AppState::new(Arc::new(service)),
        config.server.cors_origin.as_deref(),
    );

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(address = %address, "server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
