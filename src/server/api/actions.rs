// POST /api/actions - swipe decisions

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::{ok, ApiResult};
use crate::events::StoreEvent;
use crate::server::AppState;
use crate::store::{Action, Match, NewAction};

#[derive(Debug, Serialize)]
pub struct ActionPayload {
    pub action: Action,
    /// Present when an adopt opened a match
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub opened: Option<Match>,
}

/// Append a decision to the action log. Ids are taken as given.
pub async fn record_action(
    State(state): State<AppState>,
    body: Result<Json<NewAction>, JsonRejection>,
) -> ApiResult<ActionPayload> {
    let Json(new_action) = body?;
    let (action, opened) = state.store.record_action(new_action)?;

    tracing::debug!(
        action_id = action.id,
        animal_id = action.animal_id,
        user_id = action.user_id,
        "{}",
        action.action
    );
    if let Some(m) = &opened {
        tracing::info!(match_id = m.id, animal_id = m.animal_id, "Match opened");
    }

    state.emit(StoreEvent::ActionRecorded {
        timestamp: Utc::now(),
        action_id: action.id,
        animal_id: action.animal_id,
        user_id: action.user_id,
        action: action.action,
        match_id: opened.as_ref().map(|m| m.id),
    });

    ok(ActionPayload { action, opened })
}
