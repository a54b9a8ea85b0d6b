//! Quotation server binary.
//!
//! Wires `ServerConfig` into an `HttpRateFetcher`, a `SqliteQuoteStore` and the
//! system telemetry provider, then serves `/cotacao` and `/health` with actix-web.
//! Each request runs as its own task on the worker that accepted it; workers share
//! the upstream HTTP client and the store's connection pool.
use std::fs;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use log::info;
use quote_common::Result;
use quote_server::config::ServerConfig;
use quote_server::telemetry::SystemMetrics;
use quote_server::{AppState, HttpRateFetcher, QuotationPipeline, SqliteQuoteStore, configure};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logger();
    let config = ServerConfig::parse();

    if let Some(dir) = config.database.parent() {
        fs::create_dir_all(dir)?;
    }

    let fetcher = HttpRateFetcher::new(config.upstream_url.clone(), config.pair_key.clone())?;
    let store = SqliteQuoteStore::open(&config.database, config.max_connections);
    let pipeline = QuotationPipeline::new(fetcher, store, config.fetch_timeout(), config.store_timeout());
    let state = web::Data::new(AppState::new(
        pipeline,
        Arc::new(SystemMetrics::new()),
        config.request_budget(),
        config.health_budget(),
    ));

    info!(
        "Server listening on {} (store: {}, upstream: {})",
        config.bind_addr(),
        config.database.display(),
        config.upstream_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure::<HttpRateFetcher, SqliteQuoteStore>)
    })
    .bind(config.bind_addr())?
    .run()
    .await?;

    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
