// Matches and chat threads
//
// A match is opened by an adopt action. The shelter that owned the animal at
// that moment (any shelter, for animals without an owner) and the adopting
// client are the only participants of its chat thread.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ok, ok_with_message, parse_id, ApiError, ApiResult, Auth};
use crate::events::StoreEvent;
use crate::server::AppState;
use crate::store::{Id, Match, MatchFilter, MatchStatus, Message, NewMessage, Repository, UserType};

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Match enriched with display names for the admin panel
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: Id,
    pub animal_id: Id,
    pub pet_name: String,
    pub user_id: Id,
    pub client_name: String,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MatchesPayload {
    pub matches: Vec<MatchView>,
    /// Matches still waiting for approval
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchPayload {
    #[serde(rename = "match")]
    pub approved: Match,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub match_id: Id,
    pub pet_name: String,
    pub client_name: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ChatsPayload {
    pub chats: Vec<ChatSummary>,
    /// Unread messages across all threads
    pub unread: usize,
}

#[derive(Debug, Serialize)]
pub struct MessagesPayload {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct MessagePayload {
    pub message: Message,
}

/// Request body for POST /api/matches/:id/messages
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn pet_name(store: &dyn Repository, animal_id: Id) -> Result<String, ApiError> {
    Ok(store
        .find_animal(animal_id)?
        .map(|a| a.name)
        .unwrap_or_else(|| format!("Animal #{}", animal_id)))
}

fn client_name(store: &dyn Repository, user_id: Id) -> Result<String, ApiError> {
    Ok(store
        .find_user(user_id)?
        .map(|u| u.name)
        .unwrap_or_else(|| format!("User #{}", user_id)))
}

fn find_match(store: &dyn Repository, raw_id: &str) -> Result<Match, ApiError> {
    let id = parse_id(raw_id, "match")?;
    store
        .find_match(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Match {} not found", id)))
}

/// Shelters reach the matches they own or that opened on an unowned animal,
/// clients their own. Ownership comes from the match, not the live animal.
fn authorize_participant(auth: &Auth, m: &Match) -> Result<(), ApiError> {
    let allowed = match auth.role {
        UserType::Client => m.user_id == auth.user_id,
        UserType::Ong => m.ong_id.is_none_or(|owner| owner == auth.user_id),
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not a participant of this match".into()))
    }
}

fn shelter_matches(store: &dyn Repository, ong_id: Id) -> Result<Vec<Match>, ApiError> {
    Ok(store.list_matches(&MatchFilter {
        ong_id: Some(ong_id),
        user_id: None,
    })?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/matches - The calling shelter's matches
pub async fn list_matches(State(state): State<AppState>, auth: Auth) -> ApiResult<MatchesPayload> {
    auth.require_ong()?;
    let store = state.store.as_ref();

    let matches = shelter_matches(store, auth.user_id)?
        .into_iter()
        .map(|m| {
            Ok(MatchView {
                pet_name: pet_name(store, m.animal_id)?,
                client_name: client_name(store, m.user_id)?,
                id: m.id,
                animal_id: m.animal_id,
                user_id: m.user_id,
                status: m.status,
                created_at: m.created_at,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let pending = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Pending)
        .count();

    ok(MatchesPayload { matches, pending })
}

/// POST /api/matches/:id/approve - Idempotent
pub async fn approve_match(
    State(state): State<AppState>,
    auth: Auth,
    Path(raw_id): Path<String>,
) -> ApiResult<MatchPayload> {
    auth.require_ong()?;
    let store = state.store.as_ref();

    let m = find_match(store, &raw_id)?;
    authorize_participant(&auth, &m)?;

    let approved = store.approve_match(m.id)?;
    if m.status == MatchStatus::Pending {
        tracing::info!(match_id = m.id, ong_id = auth.user_id, "Match approved");
        state.emit(StoreEvent::MatchApproved {
            timestamp: Utc::now(),
            match_id: m.id,
            approved_by: auth.user_id,
        });
    }

    ok_with_message("Match approved", MatchPayload { approved })
}

/// GET /api/chats - Threads with at least one message, newest first
pub async fn list_chats(State(state): State<AppState>, auth: Auth) -> ApiResult<ChatsPayload> {
    auth.require_ong()?;
    let store = state.store.as_ref();

    let mut chats = Vec::new();
    for m in shelter_matches(store, auth.user_id)? {
        let messages = store.list_messages(m.id)?;
        let Some(last) = messages.last() else {
            continue;
        };

        let unread_count = messages
            .iter()
            .filter(|msg| msg.sender_role == UserType::Client && !msg.read)
            .count();

        chats.push(ChatSummary {
            match_id: m.id,
            pet_name: pet_name(store, m.animal_id)?,
            client_name: client_name(store, m.user_id)?,
            last_message: last.text.clone(),
            last_message_time: last.timestamp,
            unread_count,
        });
    }

    chats.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
    let unread = chats.iter().map(|c| c.unread_count).sum();

    ok(ChatsPayload { chats, unread })
}

/// GET /api/matches/:id/messages - Thread contents; marks the other side's
/// messages as read
pub async fn list_messages(
    State(state): State<AppState>,
    auth: Auth,
    Path(raw_id): Path<String>,
) -> ApiResult<MessagesPayload> {
    let store = state.store.as_ref();

    let m = find_match(store, &raw_id)?;
    authorize_participant(&auth, &m)?;

    let marked = store.mark_read(m.id, auth.role)?;
    if marked > 0 {
        tracing::debug!(match_id = m.id, marked, "Messages marked read");
    }

    let messages = store.list_messages(m.id)?;
    ok(MessagesPayload { messages })
}

/// POST /api/matches/:id/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: Auth,
    Path(raw_id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<MessagePayload> {
    let store = state.store.as_ref();

    let m = find_match(store, &raw_id)?;
    authorize_participant(&auth, &m)?;
    let Json(request) = body?;

    let message = store.add_message(NewMessage {
        match_id: m.id,
        sender_id: auth.user_id,
        sender_role: auth.role,
        text: request.text,
    })?;

    state.emit(StoreEvent::MessageSent {
        timestamp: Utc::now(),
        match_id: m.id,
        message_id: message.id,
        sender_id: auth.user_id,
    });

    ok(MessagePayload { message })
}
