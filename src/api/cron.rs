use axum::{ extract::State, http::{ HeaderMap, StatusCode }, Json };

use crate::error::Result;
use crate::scheduler::RunReport;

use super::{ authorize, AppState };

/// Scheduler entry point: runs one alert sweep and reports its counts.
pub async fn run_alerts(
    State(state): State<AppState>,
    headers: HeaderMap
) -> Result<(StatusCode, Json<RunReport>)> {
    authorize(&headers, state.cron_secret.as_deref())?;

    let report = state.alert_job.run_once().await;

    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(report)))
}
