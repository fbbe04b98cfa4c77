// PetMatch - pet adoption matching service
//
// Runs either the JSON API (default) or the terminal swiper (`petmatch swipe`).
//
// Server mode wiring:
// - Store: in-memory repository, seeded with the demo catalog
// - Server (axum): handlers emit StoreEvents into an mpsc channel
// - Journal: drains the channel into a JSONL file per run
// - Shutdown: Ctrl+C fires a oneshot into axum's graceful shutdown

mod cli;
mod startup;

use std::sync::Arc;

use anyhow::Result;
use cli::{Mode, SwipeArgs};
use petmatch::config::{Config, LoggingConfig};
use petmatch::events::generate_session_id;
use petmatch::server::{self, AppState};
use petmatch::storage::Journal;
use petmatch::store::{seed, MemoryStore};
use petmatch::swipe::terminal::{run_swiper, SwipeOptions};
use tokio::sync::{mpsc, oneshot};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let mode = match cli::handle_cli() {
        Mode::Done => return Ok(()),
        mode => mode,
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    // The swiper owns the terminal, so it only logs to file
    let stdout_logs = matches!(mode, Mode::Serve);
    let _file_guard = init_tracing(&config.logging, stdout_logs);

    match mode {
        Mode::Swipe(args) => swipe(config, args).await,
        _ => serve(config).await,
    }
}

/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(logging: &LoggingConfig, stdout: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.default_directive().into());

    let stdout_layer = stdout.then(tracing_subscriber::fmt::layer);

    let (file_layer, guard) = if logging.file_enabled {
        match logging.file_appender() {
            Ok(file_appender) => {
                // Writes happen on a background thread; the guard flushes on drop
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

async fn serve(config: Config) -> Result<()> {
    let session_id = generate_session_id();
    tracing::debug!("Session ID: {}", session_id);

    let store = Arc::new(MemoryStore::new());
    if config.features.seed_catalog {
        seed::seed(store.as_ref())?;
        tracing::info!("Seeded {} animals", seed::CATALOG_SIZE);
    }

    let mut state = AppState::new(store, config.sessions.ttl());

    // Bounded: if the journal falls behind, events are dropped with a warning
    let journal_handle = if config.features.journal {
        let (event_tx, event_rx) = mpsc::channel(1000);
        let journal = Journal::new(config.log_dir.clone(), session_id, event_rx)?;
        state = state.with_journal(event_tx);
        Some(tokio::spawn(journal.run()))
    } else {
        None
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let bind_addr = config.bind_addr;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(bind_addr, state, shutdown_rx).await {
            tracing::error!("Server failed: {:?}", e);
        }
    });

    startup::print_startup(&config);
    startup::log_startup(&config);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    // If the send fails, the server has already stopped
    let _ = shutdown_tx.send(());

    // The journal ends once the server drops its sender
    let _ = server_handle.await;
    if let Some(handle) = journal_handle {
        match handle.await {
            Ok(Err(e)) => tracing::error!("Journal error: {:?}", e),
            Err(e) => tracing::error!("Journal task panicked: {:?}", e),
            Ok(Ok(())) => {}
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn swipe(config: Config, args: SwipeArgs) -> Result<()> {
    let options = SwipeOptions {
        server_url: args
            .server
            .unwrap_or_else(|| config.swipe.server_url.clone()),
        user_id: args.user_id,
        species: args.species.map(Into::into),
    };

    tracing::info!("Swiping against {}", options.server_url);
    run_swiper(&config.swipe, options).await
}
