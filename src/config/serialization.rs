//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string
    pub fn to_toml(&self) -> String {
        format!(
            r#"# petmatch configuration

# API server bind address (PETMATCH_BIND overrides)
bind_addr = "{bind}"

# Directory for the activity journal (PETMATCH_LOG_DIR overrides)
log_dir = "{log_dir}"

# Feature flags
[features]
journal = {journal}
seed_catalog = {seed_catalog}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging in addition to stdout
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"

# Bearer token lifetime, refreshed on every authenticated request
[sessions]
ttl_minutes = {ttl_minutes}

# ─────────────────────────────────────────────────────────────────────────────
# TERMINAL SWIPER (petmatch swipe)
# ─────────────────────────────────────────────────────────────────────────────
# Distances are in pixels. Terminal cells are converted with px_per_column
# and px_per_row. PETMATCH_SERVER_URL overrides server_url.

[swipe]
server_url = "{server_url}"
threshold_px = {threshold:?}
rotation_per_px = {rotation:?}
fade_distance_px = {fade:?}
tap_slop_px = {slop:?}
animation_ms = {animation_ms}
px_per_column = {px_col:?}
px_per_row = {px_row:?}
"#,
            bind = self.bind_addr,
            log_dir = self.log_dir.display(),
            journal = self.features.journal,
            seed_catalog = self.features.seed_catalog,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
            ttl_minutes = self.sessions.ttl_minutes,
            server_url = self.swipe.server_url,
            threshold = self.swipe.threshold_px,
            rotation = self.swipe.rotation_per_px,
            fade = self.swipe.fade_distance_px,
            slop = self.swipe.tap_slop_px,
            animation_ms = self.swipe.animation_ms,
            px_col = self.swipe.px_per_column,
            px_row = self.swipe.px_per_row,
        )
    }
}
