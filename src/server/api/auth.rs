// Login, registration and session endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ok, ok_with_message, ApiError, ApiResult, Auth, Empty};
use crate::events::StoreEvent;
use crate::server::sessions::fingerprint;
use crate::server::AppState;
use crate::store::{NewUser, StoreError, UserInfo};

/// Request body for POST /api/login
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Sent by the login page; the token lifetime does not depend on it
    #[serde(default)]
    pub remember_me: bool,
}

/// User plus the bearer token to send on later requests
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: UserInfo,
}

/// POST /api/login - Exchange credentials for a session
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionPayload> {
    let Json(request) = body?;

    let Some(user) = state
        .store
        .find_user_by_credentials(&request.email, &request.password)?
    else {
        state.emit(StoreEvent::LoginFailed {
            timestamp: Utc::now(),
            email: request.email,
        });
        return Err(ApiError::Rejected("Invalid email or password".into()));
    };

    let token = state.sessions()?.issue(user.id, user.user_type);
    tracing::info!(
        user_id = user.id,
        role = %user.user_type,
        remember_me = request.remember_me,
        token = %fingerprint(&token),
        "Login"
    );

    ok_with_message(
        "Login successful",
        SessionPayload {
            user: user.to_info(),
            token,
        },
    )
}

/// POST /api/register - Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<SessionPayload> {
    let Json(new_user) = body?;
    let email = new_user.email.clone();

    let user = match state.store.add_user(new_user) {
        Ok(user) => user,
        Err(StoreError::DuplicateEmail(_)) => {
            tracing::debug!("Registration refused, email taken");
            return Err(ApiError::Rejected("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    state.emit(StoreEvent::UserRegistered {
        timestamp: Utc::now(),
        user_id: user.id,
        email,
        user_type: user.user_type,
    });

    let token = state.sessions()?.issue(user.id, user.user_type);
    tracing::info!(user_id = user.id, role = %user.user_type, "Registered");

    ok_with_message(
        "Account created",
        SessionPayload {
            user: user.to_info(),
            token,
        },
    )
}

/// POST /api/logout - Revoke the caller's token
pub async fn logout(State(state): State<AppState>, auth: Auth) -> ApiResult<Empty> {
    state.sessions()?.revoke(auth.token());
    tracing::info!(user_id = auth.user_id, token = %fingerprint(auth.token()), "Logout");
    ok_with_message("Logged out", Empty {})
}

/// GET /api/me - The caller's own record
pub async fn me(State(state): State<AppState>, auth: Auth) -> ApiResult<UserPayload> {
    let user = state
        .store
        .find_user(auth.user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", auth.user_id)))?;

    ok(UserPayload {
        user: user.to_info(),
    })
}
