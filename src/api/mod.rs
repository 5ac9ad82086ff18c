use std::sync::Arc;

use axum::{ http::{ header, HeaderMap }, routing::get, Router };

pub mod cron;
pub mod stats;

use crate::error::{ AppError, Result };
use crate::scheduler::AlertJob;
use crate::services::MetricsService;

#[derive(Clone)]
pub struct AppState {
    pub alert_job: Arc<AlertJob>,
    pub metrics_service: Arc<MetricsService>,
    pub cron_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        alert_job: Arc<AlertJob>,
        metrics_service: Arc<MetricsService>,
        cron_secret: Option<String>
    ) -> Self {
        Self {
            alert_job,
            metrics_service,
            cron_secret: cron_secret.map(Arc::from),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/cron/alerts", get(cron::run_alerts).post(cron::run_alerts))
        .route("/api/alerts/stats", get(stats::get_stats))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Accepts `x-api-key: <secret>` or `Authorization: Bearer <secret>`.
/// With no secret configured every request is refused.
pub fn authorize(headers: &HeaderMap, secret: Option<&str>) -> Result<()> {
    let secret = secret.ok_or(AppError::Unauthorized)?;

    let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    if api_key == Some(secret) || bearer == Some(secret) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
