use axum::extract::State;
use serde::Serialize;

use super::{ok, ApiResult};
use crate::config::VERSION;
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPayload {
    pub version: &'static str,
    pub animals: usize,
    pub users: usize,
    pub active_sessions: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthPayload> {
    let animals = state.store.animal_count()?;
    let users = state.store.user_count()?;
    let active_sessions = state.sessions()?.len();

    ok(HealthPayload {
        version: VERSION,
        animals,
        users,
        active_sessions,
    })
}
