// HTTP API module - JSON endpoints under /api
//
// Every response uses the same envelope: `{success, message?, ...payload}`.
// Logical failures (bad credentials, duplicate email, missing entity) are
// HTTP 200 with `success: false`, which is what the browser pages check.
// Malformed bodies and store failures are 500, session failures 401/403.

mod actions;
mod animals;
mod auth;
mod health;
mod matches;
mod stats;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequestParts,
    },
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::sessions::{fingerprint, SessionError};
use super::AppState;
use crate::store::{Id, StoreError, UserType};

pub use actions::record_action;
pub use animals::{add_animal, delete_animal, get_animal, list_animals};
pub use auth::{login, logout, me, register};
pub use health::health;
pub use matches::{approve_match, list_chats, list_matches, list_messages, send_message};
pub use stats::get_stats;

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Success envelope. The payload's fields are flattened next to `success`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

/// Payload for responses that carry nothing but the envelope
#[derive(Debug, Serialize)]
pub struct Empty {}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        success: true,
        message: None,
        data,
    }))
}

pub fn ok_with_message<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        success: true,
        message: Some(message.into()),
        data,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// API error responses
/// Converted to a failure envelope via IntoResponse
#[derive(Debug)]
pub enum ApiError {
    /// Request understood but refused (credentials, duplicate email)
    Rejected(String),
    /// Lookup miss, including ids that do not parse
    NotFound(String),
    /// Body or query did not deserialize
    Malformed(String),
    /// Missing, unknown or expired bearer token
    Unauthorized(String),
    /// Valid session, wrong role or not the owner
    Forbidden(String),
    /// No route for method + path
    NoRoute(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(_) | ApiError::NotFound(_) => StatusCode::OK,
            ApiError::Malformed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NoRoute(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Rejected(msg)
            | ApiError::NotFound(msg)
            | ApiError::Malformed(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NoRoute(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.message().to_string();

        match &self {
            ApiError::Malformed(_) | ApiError::Internal(_) => {
                tracing::error!("API error: {} - {}", status, message)
            }
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => {
                tracing::warn!("API error: {} - {}", status, message)
            }
            _ => tracing::debug!("API failure: {}", message),
        }

        let body = Envelope {
            success: false,
            message: Some(message),
            data: Empty {},
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ApiError::Rejected("Email already registered".into()),
            StoreError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", capitalize(entity), id))
            }
            StoreError::LockPoisoned => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(format!("Invalid query: {}", rejection.body_text()))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a path id. Anything that is not an integer is reported the same way
/// as an id that does not exist.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Id, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::NotFound(format!("{} {} not found", capitalize(entity), raw))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Caller identity resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct Auth {
    pub user_id: Id,
    pub role: UserType,
    token: String,
}

impl Auth {
    /// Shelter-only routes
    pub fn require_ong(&self) -> Result<(), ApiError> {
        if self.role == UserType::Ong {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Shelter account required".into()))
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .filter(|s| s.starts_with("Bearer "))
        .map(|s| s[7..].trim())
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?
            .to_string();

        let resolved = state.sessions()?.resolve(&token);
        match resolved {
            Ok(principal) => Ok(Auth {
                user_id: principal.user_id,
                role: principal.role,
                token,
            }),
            Err(SessionError::Unknown) => {
                tracing::debug!(token = %fingerprint(&token), "Unknown session token");
                Err(ApiError::Unauthorized("Invalid session".into()))
            }
            Err(SessionError::Expired) => Err(ApiError::Unauthorized("Session expired".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Rejected("x".into()).status(), StatusCode::OK);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::OK);
        assert_eq!(
            ApiError::Malformed("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NoRoute("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_map_to_envelope_failures() {
        let err: ApiError = StoreError::not_found("animal", 9).into();
        assert_eq!(err.status(), StatusCode::OK);
        assert_eq!(err.message(), "Animal 9 not found");

        let err: ApiError = StoreError::LockPoisoned.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_non_numeric_id_reads_as_not_found() {
        let err = parse_id("abc", "animal").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(parse_id("12", "animal").unwrap(), 12);
    }

    #[test]
    fn test_envelope_flattens_payload() {
        #[derive(Serialize)]
        struct Payload {
            token: String,
        }

        let json = serde_json::to_value(Envelope {
            success: true,
            message: None,
            data: Payload {
                token: "t".into(),
            },
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "token": "t"}));
    }
}
