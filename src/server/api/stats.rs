// GET /api/stats - dashboard counters

use axum::extract::{rejection::QueryRejection, Query, State};
use serde::Serialize;

use super::{ok, ApiResult};
use crate::server::AppState;
use crate::store::{Stats, StatsScope};

#[derive(Debug, Serialize)]
pub struct StatsPayload {
    pub data: Stats,
}

/// Global counters, or one shelter's with `?ongId=`
pub async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<StatsScope>, QueryRejection>,
) -> ApiResult<StatsPayload> {
    let Query(scope) = query?;
    let data = state.store.compute_stats(&scope)?;
    ok(StatsPayload { data })
}
