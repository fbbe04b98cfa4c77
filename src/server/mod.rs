//! API server setup and shared handler state

pub mod api;
pub mod sessions;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::{Method, Uri},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

use crate::events::StoreEvent;
use crate::store::Repository;
use api::ApiError;
use sessions::SessionManager;

/// Shared token table
pub type SharedSessions = Arc<Mutex<SessionManager>>;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Repository>,
    pub sessions: SharedSessions,
    /// Journal channel, `None` when the journal is disabled
    journal_tx: Option<mpsc::Sender<StoreEvent>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Repository>, session_ttl: Duration) -> Self {
        Self {
            store,
            sessions: Arc::new(Mutex::new(SessionManager::new(session_ttl))),
            journal_tx: None,
        }
    }

    pub fn with_journal(mut self, tx: mpsc::Sender<StoreEvent>) -> Self {
        self.journal_tx = Some(tx);
        self
    }

    pub(crate) fn sessions(&self) -> Result<MutexGuard<'_, SessionManager>, ApiError> {
        self.sessions
            .lock()
            .map_err(|e| ApiError::Internal(format!("Failed to lock sessions: {}", e)))
    }

    /// Queue an event for the journal. Never blocks and never fails the request.
    pub(crate) fn emit(&self, event: StoreEvent) {
        let Some(tx) = &self.journal_tx else {
            return;
        };
        if let Err(e) = tx.try_send(event) {
            tracing::warn!("Journal event dropped: {}", e);
        }
    }
}

/// Build the router with every /api route, access logging, and the 404 fallback
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Accounts
        .route("/api/login", post(api::login))
        .route("/api/register", post(api::register))
        .route("/api/logout", post(api::logout))
        .route("/api/me", get(api::me))
        // Catalog
        .route("/api/animals", get(api::list_animals).post(api::add_animal))
        .route(
            "/api/animals/:id",
            get(api::get_animal).delete(api::delete_animal),
        )
        .route("/api/stats", get(api::get_stats))
        .route("/api/actions", post(api::record_action))
        // Matches and chat
        .route("/api/matches", get(api::list_matches))
        .route("/api/matches/:id/approve", post(api::approve_match))
        .route(
            "/api/matches/:id/messages",
            get(api::list_messages).post(api::send_message),
        )
        .route("/api/chats", get(api::list_chats))
        .route("/api/health", get(api::health))
        .fallback(no_route)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn no_route(method: Method, uri: Uri) -> ApiError {
    ApiError::NoRoute(format!("No route for {} {}", method, uri.path()))
}

/// Access log: method, path, status, latency
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "{} {}",
        method,
        path
    );
    response
}

/// Bind and serve until `shutdown_rx` fires
pub async fn start_server(
    bind_addr: SocketAddr,
    state: AppState,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("API listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("API server shut down gracefully");
    Ok(())
}
