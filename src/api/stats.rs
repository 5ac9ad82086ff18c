use axum::{ extract::State, http::HeaderMap, Json };

use crate::error::Result;
use crate::services::AlertStats;

use super::{ authorize, AppState };

pub async fn get_stats(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<AlertStats>> {
    authorize(&headers, state.cron_secret.as_deref())?;

    let stats = state.metrics_service.stats().await?;
    Ok(Json(stats))
}
