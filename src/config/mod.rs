//! Configuration for the PetMatch server and terminal swiper
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/petmatch/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod features;
mod observability;
mod serialization;
mod sessions;
mod swipe;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use features::{Features, FileFeatures};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use sessions::{FileSessions, SessionsConfig};
pub use swipe::{FileSwipe, SwipeConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the API server
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the API server to
    pub bind_addr: SocketAddr,

    /// Directory for the activity journal
    pub log_dir: PathBuf,

    /// Feature flags for optional modules
    pub features: Features,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Session token lifetime
    pub sessions: SessionsConfig,

    /// Gesture tuning and server URL for `petmatch swipe`
    pub swipe: SwipeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_dir: PathBuf::from("./logs"),
            features: Features::default(),
            logging: LoggingConfig::default(),
            sessions: SessionsConfig::default(),
            swipe: SwipeConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub log_dir: Option<String>,

    /// Optional [features] section
    pub features: Option<FileFeatures>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [sessions] section
    pub sessions: Option<FileSessions>,

    /// Optional [swipe] section
    pub swipe: Option<FileSwipe>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/petmatch/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("petmatch").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists. Exits the process if the file exists
    /// but cannot be read or parsed.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => fail_fast(
                    "Failed to parse configuration file",
                    &path.display().to_string(),
                    &e.to_string(),
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => fail_fast(
                "Cannot read configuration file",
                &path.display().to_string(),
                &e.to_string(),
            ),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Bind address: env > file > default
        let bind = env("PETMATCH_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = match bind.parse() {
            Ok(addr) => addr,
            Err(e) => fail_fast("Invalid bind address", &bind, &e.to_string()),
        };

        // Journal directory: env > file > default
        let log_dir = env("PETMATCH_LOG_DIR")
            .or(file.log_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs"));

        let mut swipe = SwipeConfig::from_file(file.swipe);
        if let Some(url) = env("PETMATCH_SERVER_URL") {
            swipe.server_url = url;
        }

        Self {
            bind_addr,
            log_dir,
            features: Features::from_file(file.features),
            logging: LoggingConfig::from_file(file.logging),
            sessions: SessionsConfig::from_file(file.sessions),
            swipe,
        }
    }
}

/// Print a boxed error and exit. A broken config should stop startup, not
/// fall back to defaults while the user debugs the wrong thing.
fn fail_fast(title: &str, subject: &str, error: &str) -> ! {
    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║  CONFIG ERROR - {:<45}║", title);
    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
    eprintln!("  Subject: {}\n", subject);
    eprintln!("  Error: {}\n", error);
    eprintln!("  Tip: run `petmatch config --reset` to restore the defaults.\n");
    std::process::exit(1);
}
