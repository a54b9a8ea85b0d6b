//! HTTP surface: `GET /cotacao` and `GET /health`.
//!
//! Handlers own the request budget and all request logging. Internal errors are
//! logged with stage, elapsed time and peer address, then collapsed to a generic
//! `ErrorResponse`.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info, warn};
use quote_common::net::{HEALTH_PATH, QUOTATION_PATH};
use quote_common::response::{FETCH_FAILED, HEALTH_FAILED, PERSIST_FAILED, REQUEST_TIMEOUT};
use quote_common::{BidResponse, ErrorResponse};
use tokio::time::Instant;

use crate::fetcher::RateSource;
use crate::model::{CpuStats, HealthReport, MemoryStats};
use crate::pipeline::{QuotationOutcome, QuotationPipeline, remaining};
use crate::store::RateStore;
use crate::telemetry::MetricsProvider;

/// Shared, read-only state of the HTTP workers.
pub struct AppState<F, S> {
    pub pipeline: QuotationPipeline<F, S>,
    pub metrics: Arc<dyn MetricsProvider>,
    pub request_budget: Duration,
    pub health_budget: Duration,
    started_at: Instant,
}

impl<F, S> AppState<F, S> {
    pub fn new(
        pipeline: QuotationPipeline<F, S>,
        metrics: Arc<dyn MetricsProvider>,
        request_budget: Duration,
        health_budget: Duration,
    ) -> Self {
        Self {
            pipeline,
            metrics,
            request_budget,
            health_budget,
            started_at: Instant::now(),
        }
    }
}

/// Registers both routes; the state must be added with `App::app_data`.
pub fn configure<F, S>(cfg: &mut web::ServiceConfig)
where
    F: RateSource + 'static,
    S: RateStore + 'static,
{
    cfg.route(QUOTATION_PATH, web::get().to(quotation::<F, S>))
        .route(HEALTH_PATH, web::get().to(health::<F, S>));
}

/// "HTTP/1.1 - [/cotacao] - 127.0.0.1:51234"
fn request_line(req: &HttpRequest) -> String {
    let peer = req
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{:?} - [{}] - {}", req.version(), req.path(), peer)
}

fn collect_stats(metrics: &dyn MetricsProvider) -> quote_common::Result<(CpuStats, MemoryStats)> {
    Ok((metrics.cpu_stats()?, metrics.memory_stats()?))
}

fn timeout_response() -> HttpResponse {
    HttpResponse::RequestTimeout().json(ErrorResponse::new(REQUEST_TIMEOUT))
}

async fn quotation<F, S>(req: HttpRequest, state: web::Data<AppState<F, S>>) -> HttpResponse
where
    F: RateSource + 'static,
    S: RateStore + 'static,
{
    let started = Instant::now();
    let outcome = state.pipeline.run(started + state.request_budget).await;
    let elapsed = started.elapsed();
    let line = request_line(&req);

    match outcome {
        QuotationOutcome::Succeeded { bid, rows } => {
            info!("Request processed, {} affected in {:?} :: {}", rows, elapsed, line);
            HttpResponse::Ok().json(BidResponse::new(bid))
        }
        QuotationOutcome::TimedOut { stage } => {
            warn!("Request timeout while {} after {:?} :: {}", stage, elapsed, line);
            timeout_response()
        }
        QuotationOutcome::UpstreamFailed(e) => {
            warn!("Error getting exchange rate after {:?}: {} :: {}", elapsed, e, line);
            HttpResponse::InternalServerError().json(ErrorResponse::new(FETCH_FAILED))
        }
        QuotationOutcome::PersistFailed(e) => {
            if e.is_fatal() {
                error!("Error saving exchange rate after {:?}: {} :: {}", elapsed, e, line);
            } else {
                warn!("Error saving exchange rate after {:?}: {} :: {}", elapsed, e, line);
            }
            HttpResponse::InternalServerError().json(ErrorResponse::new(PERSIST_FAILED))
        }
    }
}

/// Health report, bounded by `AppState::health_budget`.
///
/// The budget starts when the handler runs, so the 408 branch is only taken
/// when the server is configured with a zero health budget.
async fn health<F, S>(req: HttpRequest, state: web::Data<AppState<F, S>>) -> HttpResponse
where
    F: 'static,
    S: 'static,
{
    let started = Instant::now();
    let line = request_line(&req);

    if remaining(started + state.health_budget).is_none() {
        warn!("Request timeout :: {}", line);
        return timeout_response();
    }

    let (cpu, memory) = match collect_stats(state.metrics.as_ref()) {
        Ok(stats) => stats,
        Err(e) => {
            error!("Error collecting health metrics: {} :: {}", e, line);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(HEALTH_FAILED));
        }
    };

    let report = HealthReport::pass(started.elapsed(), state.started_at.elapsed(), cpu, memory);
    info!("Request success :: {}", line);
    HttpResponse::Ok()
        .content_type("application/health+json")
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"))
        .json(report)
}
